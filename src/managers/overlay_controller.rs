//! Overlay Controller.
//!
//! Drives the note-editing panel through `Closed → Opening → Open → Closing → Closed`
//! and owns the [`NoteStore`] of the notebook being edited. The edited notes are
//! handed back to the notebook list only once the exit animation has finished.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::managers::note_store::{NoteStore, NoteStoreTrait};
use crate::managers::notebook_store::NotebookStoreTrait;
use crate::services::api_client::NotesBackend;
use crate::types::config::SpawnBounds;
use crate::types::errors::{ApiError, OverlayError};
use crate::types::note::StickyNote;
use crate::types::notebook::Notebook;
use crate::types::overlay::{OutsideClickOutcome, OverlayState};
use crate::types::sync::{FailedMutation, LoadTicket};

/// Trait defining the overlay lifecycle.
#[async_trait(?Send)]
pub trait OverlayControllerTrait {
    fn state(&self) -> OverlayState;
    fn active_notebook(&self) -> Option<&Notebook>;
    fn note_store(&self) -> Option<&NoteStore>;
    fn note_store_mut(&mut self) -> Option<&mut NoteStore>;
    /// Identifier of the current open session; bumped on every open.
    fn session(&self) -> u64;
    fn open_with_notebook(&mut self, notebook: Notebook, user_id: &str) -> Result<u64, OverlayError>;
    fn animation_complete(&mut self) -> Result<(), OverlayError>;
    fn request_close(&mut self) -> Result<(), OverlayError>;
    /// Ends the exit transition: commits the notes to `notebooks` and clears
    /// the active notebook. Returns the notebook as committed.
    fn finish_close(&mut self, notebooks: &mut dyn NotebookStoreTrait) -> Result<Notebook, OverlayError>;
    /// `request_close`, wait out the animation, then `finish_close`.
    async fn close(&mut self, notebooks: &mut dyn NotebookStoreTrait) -> Result<Notebook, OverlayError>;
    fn open_composer(&mut self) -> Result<(), OverlayError>;
    fn close_composer(&mut self) -> bool;
    fn is_composer_open(&self) -> bool;
    fn handle_outside_click(&mut self) -> OutsideClickOutcome;
    /// Fetches the open notebook's notes. `Ok(None)` means the result arrived
    /// after the overlay moved on and was dropped.
    async fn load_notes(&mut self) -> Result<Option<usize>, OverlayError>;
    /// Drains note sync failures from the open notebook and from notebooks
    /// closed since the last call.
    fn take_failed_mutations(&mut self) -> Vec<FailedMutation>;
}

struct ActiveSession {
    notebook: Notebook,
    user_id: String,
    notes: NoteStore,
}

/// Overlay state machine.
pub struct OverlayController {
    backend: Arc<dyn NotesBackend>,
    state: OverlayState,
    active: Option<ActiveSession>,
    composer_open: bool,
    session: u64,
    animation: Duration,
    spawn_bounds: SpawnBounds,
    closed_failures: Vec<FailedMutation>,
}

impl OverlayController {
    pub fn new(backend: Arc<dyn NotesBackend>, animation: Duration, spawn_bounds: SpawnBounds) -> Self {
        Self {
            backend,
            state: OverlayState::Closed,
            active: None,
            composer_open: false,
            session: 0,
            animation,
            spawn_bounds,
            closed_failures: Vec::new(),
        }
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation
    }

    /// Drops the active notebook without committing it, e.g. on sign-out.
    /// Fetches still in flight for the old session are ignored when they land.
    pub fn reset(&mut self) {
        self.active = None;
        self.closed_failures.clear();
        self.composer_open = false;
        self.state = OverlayState::Closed;
        self.session += 1;
    }

    /// Applies a notes fetch to the store, but only if the overlay is still on
    /// the same open session and the fetch is the most recent one.
    pub fn apply_loaded_notes(
        &mut self,
        session: u64,
        ticket: LoadTicket,
        result: Result<Vec<StickyNote>, ApiError>,
    ) -> Result<Option<usize>, OverlayError> {
        if session != self.session || self.state == OverlayState::Closed {
            debug!("dropping notes fetch for closed overlay session {}", session);
            return Ok(None);
        }
        let active = self.active.as_mut().ok_or(OverlayError::NoActiveNotebook)?;
        active
            .notes
            .apply_loaded(ticket, result)
            .map_err(|e| OverlayError::LoadFailed(e.to_string()))
    }

    fn transition_error(&self, action: &'static str) -> OverlayError {
        OverlayError::InvalidTransition {
            from: self.state.as_str(),
            action,
        }
    }
}

#[async_trait(?Send)]
impl OverlayControllerTrait for OverlayController {
    fn state(&self) -> OverlayState {
        self.state
    }

    fn active_notebook(&self) -> Option<&Notebook> {
        self.active.as_ref().map(|a| &a.notebook)
    }

    fn note_store(&self) -> Option<&NoteStore> {
        self.active.as_ref().map(|a| &a.notes)
    }

    fn note_store_mut(&mut self) -> Option<&mut NoteStore> {
        self.active.as_mut().map(|a| &mut a.notes)
    }

    fn session(&self) -> u64 {
        self.session
    }

    fn open_with_notebook(&mut self, notebook: Notebook, user_id: &str) -> Result<u64, OverlayError> {
        if self.state != OverlayState::Closed {
            return Err(self.transition_error("open"));
        }
        let notes = NoteStore::new(
            self.backend.clone(),
            &notebook.id,
            user_id,
            notebook.notes.clone(),
            self.spawn_bounds,
        );
        info!("overlay opening notebook {}", notebook.id);
        self.active = Some(ActiveSession {
            notebook,
            user_id: user_id.to_string(),
            notes,
        });
        self.session += 1;
        self.composer_open = false;
        self.state = OverlayState::Opening;
        Ok(self.session)
    }

    fn animation_complete(&mut self) -> Result<(), OverlayError> {
        if self.state != OverlayState::Opening {
            return Err(self.transition_error("finish opening"));
        }
        self.state = OverlayState::Open;
        Ok(())
    }

    fn request_close(&mut self) -> Result<(), OverlayError> {
        match self.state {
            OverlayState::Open | OverlayState::Opening => {
                self.composer_open = false;
                self.state = OverlayState::Closing;
                Ok(())
            }
            _ => Err(self.transition_error("close")),
        }
    }

    fn finish_close(&mut self, notebooks: &mut dyn NotebookStoreTrait) -> Result<Notebook, OverlayError> {
        if self.state != OverlayState::Closing {
            return Err(self.transition_error("finish closing"));
        }
        let mut active = self.active.take().ok_or(OverlayError::NoActiveNotebook)?;
        self.closed_failures.extend(active.notes.take_failed_mutations());
        let notes = active.notes.into_notes();
        let committed = Notebook {
            notes: notes.clone(),
            ..active.notebook
        };
        notebooks.commit_notes(committed.clone(), notes);
        self.state = OverlayState::Closed;
        info!(
            "overlay closed, committed {} notes to notebook {}",
            committed.notes.len(),
            committed.id
        );
        Ok(committed)
    }

    async fn close(&mut self, notebooks: &mut dyn NotebookStoreTrait) -> Result<Notebook, OverlayError> {
        if self.state != OverlayState::Closing {
            self.request_close()?;
        }
        tokio::time::sleep(self.animation).await;
        self.finish_close(notebooks)
    }

    fn open_composer(&mut self) -> Result<(), OverlayError> {
        if self.state != OverlayState::Open {
            return Err(self.transition_error("open the composer of"));
        }
        self.composer_open = true;
        Ok(())
    }

    fn close_composer(&mut self) -> bool {
        std::mem::replace(&mut self.composer_open, false)
    }

    fn is_composer_open(&self) -> bool {
        self.composer_open
    }

    fn handle_outside_click(&mut self) -> OutsideClickOutcome {
        if self.close_composer() {
            return OutsideClickOutcome::ComposerClosed;
        }
        match self.request_close() {
            Ok(()) => OutsideClickOutcome::OverlayClosing,
            Err(_) => OutsideClickOutcome::Ignored,
        }
    }

    async fn load_notes(&mut self) -> Result<Option<usize>, OverlayError> {
        let session = self.session;
        let (ticket, notebook_id, user_id) = {
            let active = self.active.as_mut().ok_or(OverlayError::NoActiveNotebook)?;
            (
                active.notes.begin_load(),
                active.notebook.id.clone(),
                active.user_id.clone(),
            )
        };
        let result = self.backend.list_notes(&notebook_id, &user_id).await;
        self.apply_loaded_notes(session, ticket, result)
    }

    fn take_failed_mutations(&mut self) -> Vec<FailedMutation> {
        let mut failed = std::mem::take(&mut self.closed_failures);
        if let Some(active) = self.active.as_mut() {
            failed.extend(active.notes.take_failed_mutations());
        }
        failed
    }
}
