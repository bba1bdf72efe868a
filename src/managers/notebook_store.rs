//! Notebook List Store.
//!
//! Keeps the signed-in user's notebooks, the list fetch status, and the
//! single in-progress rename. Mutations follow the same optimistic,
//! log-on-failure policy as the note store.

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use uuid::Uuid;

use crate::services::api_client::NotesBackend;
use crate::types::errors::{ApiError, NotebookError};
use crate::types::note::StickyNote;
use crate::types::notebook::{LoadState, Notebook, RenameDraft};
use crate::types::sync::{EntityKind, FailedMutation, LoadTicket, MutationAction};

/// Trait defining notebook list operations.
#[async_trait(?Send)]
pub trait NotebookStoreTrait {
    fn notebooks(&self) -> &[Notebook];
    fn get_notebook(&self, id: &str) -> Option<&Notebook>;
    fn load_state(&self) -> &LoadState;
    fn is_loading(&self) -> bool;
    fn error(&self) -> Option<&str>;
    async fn load_notebooks(&mut self) -> Result<usize, NotebookError>;
    /// Re-runs the list fetch after a failure.
    async fn retry(&mut self) -> Result<usize, NotebookError>;
    /// Mints a notebook and posts it. The notebook joins the list when the
    /// overlay editing it is closed.
    async fn create_notebook(&mut self, name: Option<&str>) -> Result<Notebook, NotebookError>;
    fn begin_rename(&mut self, id: &str) -> Result<(), NotebookError>;
    fn set_rename_draft(&mut self, text: &str) -> Result<(), NotebookError>;
    fn cancel_rename(&mut self) -> Result<(), NotebookError>;
    async fn save_rename(&mut self) -> Result<Notebook, NotebookError>;
    async fn delete_notebook(&mut self, id: &str) -> Result<(), NotebookError>;
    /// Stores the notes edited in the overlay, appending `notebook` if it is not listed yet.
    fn commit_notes(&mut self, notebook: Notebook, notes: Vec<StickyNote>);
    /// Returns the notebook for opening in the overlay; refused while it is being renamed.
    fn select(&self, id: &str) -> Result<&Notebook, NotebookError>;
    fn rename_draft(&self) -> Option<&RenameDraft>;
    fn next_default_name(&self) -> String;
    fn take_failed_mutations(&mut self) -> Vec<FailedMutation>;
}

/// In-memory notebook list for one user.
pub struct NotebookStore {
    backend: Arc<dyn NotesBackend>,
    user_id: String,
    notebooks: Vec<Notebook>,
    state: LoadState,
    rename: Option<RenameDraft>,
    max_name_len: usize,
    generation: u64,
    failed: Vec<FailedMutation>,
    unreconciled: usize,
}

impl NotebookStore {
    pub fn new(backend: Arc<dyn NotesBackend>, user_id: &str, max_name_len: usize) -> Self {
        Self {
            backend,
            user_id: user_id.to_string(),
            notebooks: Vec::new(),
            state: LoadState::Idle,
            rename: None,
            max_name_len,
            generation: 0,
            failed: Vec::new(),
            unreconciled: 0,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn unreconciled_count(&self) -> usize {
        self.unreconciled
    }

    /// Trims `name` and checks it against the length limit.
    pub fn validate_name(&self, name: &str) -> Result<String, NotebookError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NotebookError::InvalidName("name must not be empty".to_string()));
        }
        if trimmed.chars().count() > self.max_name_len {
            return Err(NotebookError::InvalidName(format!(
                "name exceeds {} characters",
                self.max_name_len
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Starts a full fetch; earlier tickets become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Applies the result of the fetch started with `ticket`. Stale results are
    /// dropped and reported as `Ok(None)`.
    pub fn apply_loaded(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Notebook>, ApiError>,
    ) -> Result<Option<usize>, NotebookError> {
        if ticket.0 != self.generation {
            return Ok(None);
        }
        match result {
            Ok(notebooks) => {
                if self.unreconciled > 0 {
                    warn!(
                        "notebook reload discards {} unsynced local change(s)",
                        self.unreconciled
                    );
                    self.unreconciled = 0;
                }
                self.notebooks = notebooks;
                self.state = LoadState::Loaded;
                let orphaned = self.rename.as_ref().is_some_and(|draft| {
                    !self.notebooks.iter().any(|nb| nb.id == draft.notebook_id)
                });
                if orphaned {
                    self.rename = None;
                }
                info!("loaded {} notebooks for user {}", self.notebooks.len(), self.user_id);
                Ok(Some(self.notebooks.len()))
            }
            Err(e) => {
                error!("failed to fetch notebooks: {}", e);
                self.state = LoadState::Failed(
                    "An unexpected error occurred while fetching notebooks.".to_string(),
                );
                Err(NotebookError::LoadFailed(e.to_string()))
            }
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.notebooks.iter().position(|nb| nb.id == id)
    }

    fn record_failure(&mut self, id: &str, action: MutationAction, err: ApiError) {
        warn!("notebook {} {:?} failed to sync: {}", id, action, err);
        self.unreconciled += 1;
        self.failed.push(FailedMutation {
            entity: EntityKind::Notebook,
            id: id.to_string(),
            action,
            error: err.to_string(),
        });
    }
}

#[async_trait(?Send)]
impl NotebookStoreTrait for NotebookStore {
    fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    fn get_notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|nb| nb.id == id)
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }

    fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    async fn load_notebooks(&mut self) -> Result<usize, NotebookError> {
        let ticket = self.begin_load();
        let result = self.backend.list_notebooks(&self.user_id).await;
        Ok(self
            .apply_loaded(ticket, result)?
            .unwrap_or(self.notebooks.len()))
    }

    async fn retry(&mut self) -> Result<usize, NotebookError> {
        self.load_notebooks().await
    }

    async fn create_notebook(&mut self, name: Option<&str>) -> Result<Notebook, NotebookError> {
        let name = match name {
            Some(n) => self.validate_name(n)?,
            None => self.next_default_name(),
        };
        let notebook = Notebook::new(Uuid::new_v4().to_string(), name);
        info!("creating notebook {} ({})", notebook.id, notebook.name);

        if let Err(e) = self
            .backend
            .create_notebook(&notebook.id, &self.user_id, &notebook.name)
            .await
        {
            self.record_failure(&notebook.id, MutationAction::Create, e);
        }
        Ok(notebook)
    }

    fn begin_rename(&mut self, id: &str) -> Result<(), NotebookError> {
        if let Some(draft) = &self.rename {
            return Err(NotebookError::AlreadyEditing(draft.notebook_id.clone()));
        }
        let notebook = self
            .get_notebook(id)
            .ok_or_else(|| NotebookError::NotFound(id.to_string()))?;
        self.rename = Some(RenameDraft {
            notebook_id: notebook.id.clone(),
            original_name: notebook.name.clone(),
            draft: notebook.name.clone(),
        });
        Ok(())
    }

    fn set_rename_draft(&mut self, text: &str) -> Result<(), NotebookError> {
        let draft = self.rename.as_mut().ok_or(NotebookError::NotEditing)?;
        draft.draft = text.to_string();
        Ok(())
    }

    fn cancel_rename(&mut self) -> Result<(), NotebookError> {
        self.rename.take().map(|_| ()).ok_or(NotebookError::NotEditing)
    }

    async fn save_rename(&mut self) -> Result<Notebook, NotebookError> {
        let draft = self.rename.clone().ok_or(NotebookError::NotEditing)?;
        let name = self.validate_name(&draft.draft)?;
        let idx = self
            .index_of(&draft.notebook_id)
            .ok_or_else(|| NotebookError::NotFound(draft.notebook_id.clone()))?;

        self.notebooks[idx].name = name.clone();
        self.rename = None;
        info!("notebook {} renamed to {}", draft.notebook_id, name);

        if let Err(e) = self.backend.rename_notebook(&draft.notebook_id, &name).await {
            self.record_failure(&draft.notebook_id, MutationAction::Update, e);
        }
        Ok(self.notebooks[idx].clone())
    }

    async fn delete_notebook(&mut self, id: &str) -> Result<(), NotebookError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| NotebookError::NotFound(id.to_string()))?;
        self.notebooks.remove(idx);
        if self.rename.as_ref().is_some_and(|d| d.notebook_id == id) {
            self.rename = None;
        }
        info!("notebook {} deleted", id);

        if let Err(e) = self.backend.delete_notebook(id, &self.user_id).await {
            self.record_failure(id, MutationAction::Delete, e);
        }
        Ok(())
    }

    fn commit_notes(&mut self, notebook: Notebook, notes: Vec<StickyNote>) {
        match self.index_of(&notebook.id) {
            Some(idx) => self.notebooks[idx].notes = notes,
            None => self.notebooks.push(Notebook { notes, ..notebook }),
        }
    }

    fn select(&self, id: &str) -> Result<&Notebook, NotebookError> {
        if self.rename.as_ref().is_some_and(|d| d.notebook_id == id) {
            return Err(NotebookError::AlreadyEditing(id.to_string()));
        }
        self.get_notebook(id)
            .ok_or_else(|| NotebookError::NotFound(id.to_string()))
    }

    fn rename_draft(&self) -> Option<&RenameDraft> {
        self.rename.as_ref()
    }

    fn next_default_name(&self) -> String {
        format!("Notebook {}", self.notebooks.len() + 1)
    }

    fn take_failed_mutations(&mut self) -> Vec<FailedMutation> {
        std::mem::take(&mut self.failed)
    }
}
