//! In-process notes backend.
//!
//! Keeps notebooks and notes in memory and can be told to fail reads or
//! mutations, which makes it the backend of choice for offline runs and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::services::api_client::NotesBackend;
use crate::types::errors::ApiError;
use crate::types::note::{NotePositionUpdate, StickyNote};
use crate::types::notebook::Notebook;
use crate::types::user::UserInfo;

#[derive(Default)]
struct MemoryState {
    users_by_token: HashMap<String, UserInfo>,
    /// (owner user ID, notebook) in creation order.
    notebooks: Vec<(String, Notebook)>,
    fail_reads: bool,
    fail_mutations: bool,
    calls: Vec<String>,
}

impl MemoryState {
    fn notebook_mut(&mut self, id: &str) -> Option<&mut Notebook> {
        self.notebooks.iter_mut().map(|(_, nb)| nb).find(|nb| nb.id == id)
    }

    fn note_mut(&mut self, id: &str) -> Option<&mut StickyNote> {
        self.notebooks
            .iter_mut()
            .flat_map(|(_, nb)| nb.notes.iter_mut())
            .find(|n| n.id == id)
    }
}

/// `NotesBackend` that stores everything in memory.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers an identity token that verifies to `user`.
    pub fn add_user(&self, token: &str, user: UserInfo) {
        self.lock().users_by_token.insert(token.to_string(), user);
    }

    /// Seeds a notebook (with its notes) owned by `user_id`.
    pub fn seed_notebook(&self, user_id: &str, notebook: Notebook) {
        self.lock().notebooks.push((user_id.to_string(), notebook));
    }

    /// When set, every list/verify request fails with a network error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// When set, every create/update/delete request fails with a 500.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.lock().fail_mutations = fail;
    }

    /// Requests received so far, formatted as `METHOD /path`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn notebooks_for(&self, user_id: &str) -> Vec<Notebook> {
        self.lock()
            .notebooks
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, nb)| nb.clone())
            .collect()
    }

    pub fn notes_for(&self, notebook_id: &str) -> Vec<StickyNote> {
        self.lock()
            .notebooks
            .iter()
            .find(|(_, nb)| nb.id == notebook_id)
            .map(|(_, nb)| nb.notes.clone())
            .unwrap_or_default()
    }

    fn begin_read(&self, call: String) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_reads {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(state)
    }

    fn begin_mutation(&self, call: String) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_mutations {
            return Err(ApiError::Status(500, "Internal Server Error".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl NotesBackend for MemoryBackend {
    async fn verify_token(&self, token: &str) -> Result<Option<UserInfo>, ApiError> {
        let state = self.begin_read("POST /auth/verify-token".to_string())?;
        Ok(state.users_by_token.get(token).cloned())
    }

    async fn list_notebooks(&self, user_id: &str) -> Result<Vec<Notebook>, ApiError> {
        let state = self.begin_read(format!("GET /notebooks?userId={}", user_id))?;
        Ok(state
            .notebooks
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, nb)| Notebook::new(nb.id.clone(), nb.name.clone()))
            .collect())
    }

    async fn create_notebook(&self, id: &str, user_id: &str, name: &str) -> Result<(), ApiError> {
        let mut state = self.begin_mutation("POST /notebooks".to_string())?;
        state.notebooks.push((user_id.to_string(), Notebook::new(id, name)));
        Ok(())
    }

    async fn rename_notebook(&self, id: &str, name: &str) -> Result<(), ApiError> {
        let mut state = self.begin_mutation(format!("PATCH /notebooks/{}", id))?;
        let notebook = state
            .notebook_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        notebook.name = name.to_string();
        Ok(())
    }

    async fn delete_notebook(&self, id: &str, user_id: &str) -> Result<(), ApiError> {
        let mut state = self.begin_mutation(format!("DELETE /notebooks/{}", id))?;
        let before = state.notebooks.len();
        state
            .notebooks
            .retain(|(owner, nb)| !(nb.id == id && owner == user_id));
        if state.notebooks.len() == before {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_notes(&self, notebook_id: &str, user_id: &str) -> Result<Vec<StickyNote>, ApiError> {
        let state = self.begin_read(format!("GET /notes/{}?userId={}", notebook_id, user_id))?;
        state
            .notebooks
            .iter()
            .find(|(owner, nb)| nb.id == notebook_id && owner == user_id)
            .map(|(_, nb)| nb.notes.clone())
            .ok_or_else(|| ApiError::NotFound(notebook_id.to_string()))
    }

    async fn create_note(&self, notebook_id: &str, _user_id: &str, note: &StickyNote) -> Result<(), ApiError> {
        let mut state = self.begin_mutation(format!("POST /notes/{}", notebook_id))?;
        let notebook = state
            .notebook_mut(notebook_id)
            .ok_or_else(|| ApiError::NotFound(notebook_id.to_string()))?;
        notebook.notes.push(note.clone());
        Ok(())
    }

    async fn update_note_position(&self, id: &str, position: NotePositionUpdate) -> Result<(), ApiError> {
        let mut state = self.begin_mutation(format!("PATCH /notes/{}", id))?;
        let note = state
            .note_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        note.x_percent = position.x_percent;
        note.y_percent = position.y_percent;
        Ok(())
    }

    async fn delete_note(&self, id: &str, _user_id: &str) -> Result<(), ApiError> {
        let mut state = self.begin_mutation(format!("DELETE /notes/{}", id))?;
        let mut removed = false;
        for (_, notebook) in state.notebooks.iter_mut() {
            let before = notebook.notes.len();
            notebook.notes.retain(|n| n.id != id);
            removed |= notebook.notes.len() != before;
        }
        if !removed {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
