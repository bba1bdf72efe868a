//! Sticky Note Store.
//!
//! Holds the notes of the notebook open in the overlay. Every mutation is
//! applied locally first and then mirrored to the backend; a backend failure
//! is logged and recorded but never rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::services::api_client::NotesBackend;
use crate::services::coordinates::{clamp_percent, position_to_percent, position_to_pixels, random_spawn_position};
use crate::types::config::SpawnBounds;
use crate::types::errors::{ApiError, NoteError};
use crate::types::geometry::{ContainerSize, PercentPosition, PixelPosition};
use crate::types::note::{NotePositionUpdate, RenderedNote, StickyNote};
use crate::types::sync::{EntityKind, FailedMutation, LoadTicket, MutationAction};

/// Trait defining sticky note operations for one open notebook.
#[async_trait(?Send)]
pub trait NoteStoreTrait {
    fn notebook_id(&self) -> &str;
    fn notes(&self) -> &[StickyNote];
    fn get_note(&self, id: &str) -> Option<&StickyNote>;
    fn note_count(&self) -> usize;
    /// Adds a note with `content` at a random position. Blank content is ignored.
    async fn add_note(&mut self, content: &str) -> Option<String>;
    async fn move_note(&mut self, id: &str, x_percent: f64, y_percent: f64) -> Result<(), NoteError>;
    /// Converts a drag-stop pixel position to percentages and moves the note there.
    async fn drag_stop(&mut self, id: &str, position: PixelPosition, container: ContainerSize) -> Result<(), NoteError>;
    /// Removes a note. Returns `false` (and sends nothing) when it is already gone.
    async fn delete_note(&mut self, id: &str) -> bool;
    /// Replaces local notes with the backend's copy. Returns the number of notes loaded.
    async fn load_notes(&mut self) -> Result<usize, NoteError>;
    /// Re-clamps every stored position after the container was resized.
    /// Returns how many notes had to be moved.
    fn handle_resize(&mut self, container: ContainerSize) -> usize;
    fn render_positions(&self, container: ContainerSize) -> Vec<RenderedNote>;
    fn take_failed_mutations(&mut self) -> Vec<FailedMutation>;
}

/// In-memory note list scoped to one notebook and user.
pub struct NoteStore {
    backend: Arc<dyn NotesBackend>,
    notebook_id: String,
    user_id: String,
    notes: Vec<StickyNote>,
    spawn_bounds: SpawnBounds,
    generation: u64,
    failed: Vec<FailedMutation>,
    /// Failures recorded since the last applied reload.
    unreconciled: usize,
}

impl NoteStore {
    /// Creates a store seeded with the notebook's current `notes`.
    ///
    /// Positions are taken as-is; out-of-range values are corrected by the
    /// next resize or reload.
    pub fn new(
        backend: Arc<dyn NotesBackend>,
        notebook_id: &str,
        user_id: &str,
        notes: Vec<StickyNote>,
        spawn_bounds: SpawnBounds,
    ) -> Self {
        Self {
            backend,
            notebook_id: notebook_id.to_string(),
            user_id: user_id.to_string(),
            notes,
            spawn_bounds,
            generation: 0,
            failed: Vec::new(),
            unreconciled: 0,
        }
    }

    pub fn into_notes(self) -> Vec<StickyNote> {
        self.notes
    }

    pub fn failed_mutations(&self) -> &[FailedMutation] {
        &self.failed
    }

    /// Number of sync failures the next reload will discard.
    pub fn unreconciled_count(&self) -> usize {
        self.unreconciled
    }

    /// Starts a full fetch. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Applies the result of the fetch started with `ticket`.
    ///
    /// Returns `Ok(None)` when a newer fetch has started since, in which case
    /// the result is dropped.
    pub fn apply_loaded(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<StickyNote>, ApiError>,
    ) -> Result<Option<usize>, NoteError> {
        if ticket.0 != self.generation {
            debug!(
                "dropping stale notes fetch for notebook {} (ticket {}, current {})",
                self.notebook_id, ticket.0, self.generation
            );
            return Ok(None);
        }
        let notes = result.map_err(|e| NoteError::LoadFailed(e.to_string()))?;
        if self.unreconciled > 0 {
            warn!(
                "reload of notebook {} discards {} unsynced note change(s)",
                self.notebook_id, self.unreconciled
            );
            self.unreconciled = 0;
        }
        self.notes = notes.into_iter().map(clamped).collect();
        Ok(Some(self.notes.len()))
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    fn record_failure(&mut self, id: &str, action: MutationAction, err: ApiError) {
        warn!("note {} {:?} failed to sync: {}", id, action, err);
        self.unreconciled += 1;
        self.failed.push(FailedMutation {
            entity: EntityKind::Note,
            id: id.to_string(),
            action,
            error: err.to_string(),
        });
    }
}

fn clamped(mut note: StickyNote) -> StickyNote {
    note.x_percent = clamp_percent(note.x_percent);
    note.y_percent = clamp_percent(note.y_percent);
    note
}

#[async_trait(?Send)]
impl NoteStoreTrait for NoteStore {
    fn notebook_id(&self) -> &str {
        &self.notebook_id
    }

    fn notes(&self) -> &[StickyNote] {
        &self.notes
    }

    fn get_note(&self, id: &str) -> Option<&StickyNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn note_count(&self) -> usize {
        self.notes.len()
    }

    async fn add_note(&mut self, content: &str) -> Option<String> {
        if content.trim().is_empty() {
            return None;
        }

        let position = random_spawn_position(&mut rand::thread_rng(), &self.spawn_bounds);
        let note = StickyNote {
            id: Uuid::new_v4().to_string(),
            x_percent: position.x,
            y_percent: position.y,
            content: content.to_string(),
        };
        let id = note.id.clone();
        self.notes.push(note.clone());
        info!("note {} added to notebook {}", id, self.notebook_id);

        if let Err(e) = self
            .backend
            .create_note(&self.notebook_id, &self.user_id, &note)
            .await
        {
            self.record_failure(&id, MutationAction::Create, e);
        }
        Some(id)
    }

    async fn move_note(&mut self, id: &str, x_percent: f64, y_percent: f64) -> Result<(), NoteError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        let update = NotePositionUpdate {
            x_percent: clamp_percent(x_percent),
            y_percent: clamp_percent(y_percent),
        };
        self.notes[idx].x_percent = update.x_percent;
        self.notes[idx].y_percent = update.y_percent;

        if let Err(e) = self.backend.update_note_position(id, update).await {
            self.record_failure(id, MutationAction::Update, e);
        }
        Ok(())
    }

    async fn drag_stop(&mut self, id: &str, position: PixelPosition, container: ContainerSize) -> Result<(), NoteError> {
        let percent = position_to_percent(position, container);
        self.move_note(id, percent.x, percent.y).await
    }

    async fn delete_note(&mut self, id: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.notes.remove(idx);
        info!("note {} deleted from notebook {}", id, self.notebook_id);

        if let Err(e) = self.backend.delete_note(id, &self.user_id).await {
            self.record_failure(id, MutationAction::Delete, e);
        }
        true
    }

    async fn load_notes(&mut self) -> Result<usize, NoteError> {
        let ticket = self.begin_load();
        let result = self
            .backend
            .list_notes(&self.notebook_id, &self.user_id)
            .await;
        Ok(self.apply_loaded(ticket, result)?.unwrap_or(self.notes.len()))
    }

    fn handle_resize(&mut self, container: ContainerSize) -> usize {
        debug!(
            "overlay resized to {}x{}, re-clamping {} notes",
            container.width,
            container.height,
            self.notes.len()
        );
        let mut moved = 0;
        for note in self.notes.iter_mut() {
            let x = clamp_percent(note.x_percent);
            let y = clamp_percent(note.y_percent);
            if x != note.x_percent || y != note.y_percent {
                note.x_percent = x;
                note.y_percent = y;
                moved += 1;
            }
        }
        moved
    }

    fn render_positions(&self, container: ContainerSize) -> Vec<RenderedNote> {
        self.notes
            .iter()
            .map(|note| {
                let pixels = position_to_pixels(
                    PercentPosition {
                        x: note.x_percent,
                        y: note.y_percent,
                    },
                    container,
                );
                RenderedNote {
                    id: note.id.clone(),
                    x: pixels.x,
                    y: pixels.y,
                    content: note.content.clone(),
                }
            })
            .collect()
    }

    fn take_failed_mutations(&mut self) -> Vec<FailedMutation> {
        std::mem::take(&mut self.failed)
    }
}
