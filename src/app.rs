//! App Core for the notes client.
//!
//! Holds the configuration, backend, and controllers, and wires the control
//! flow between them: the session gates the notebook list, selecting a
//! notebook hands it to the overlay, and closing the overlay commits the
//! edited notes back to the list.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::database::connection::Database;
use crate::managers::note_store::{NoteStore, NoteStoreTrait};
use crate::managers::notebook_store::{NotebookStore, NotebookStoreTrait};
use crate::managers::overlay_controller::{OverlayController, OverlayControllerTrait};
use crate::managers::session_controller::{SessionController, SessionControllerTrait};
use crate::platform;
use crate::services::api_client::{HttpBackend, NotesBackend};
use crate::services::token_store::{SqliteTokenStore, TokenStoreTrait};
use crate::types::config::AppConfig;
use crate::types::errors::{AppError, AuthError, NotebookError, OverlayError};
use crate::types::notebook::Notebook;
use crate::types::overlay::{OutsideClickOutcome, OverlayState};
use crate::types::session::SessionState;
use crate::types::sync::FailedMutation;
use crate::types::user::UserInfo;

/// File name of the client-side SQLite store inside the data directory.
pub const DATABASE_FILE: &str = "notes.db";

/// Central application struct holding all controllers.
///
/// The notebook store only exists while a user is signed in.
pub struct App {
    pub config: AppConfig,
    pub backend: Arc<dyn NotesBackend>,
    pub session: SessionController,
    pub notebooks: Option<NotebookStore>,
    pub overlay: OverlayController,
}

impl App {
    /// Creates an App from explicitly constructed collaborators.
    pub fn new(config: AppConfig, backend: Arc<dyn NotesBackend>, tokens: Box<dyn TokenStoreTrait>) -> Self {
        let session = SessionController::new(backend.clone(), tokens);
        let overlay = OverlayController::new(
            backend.clone(),
            Duration::from_millis(config.animation_duration_ms),
            config.spawn_bounds,
        );
        Self {
            config,
            backend,
            session,
            notebooks: None,
            overlay,
        }
    }

    /// Creates an App talking HTTP to `config.server_url`, with the token kept
    /// in `notes.db` under the platform data directory.
    pub fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_data_dir(config, &platform::get_data_dir())
    }

    /// Like [`App::from_config`] but with an explicit data directory.
    pub fn with_data_dir(config: AppConfig, data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(data_dir)?;
        let db = Arc::new(Database::open(data_dir.join(DATABASE_FILE))?);
        let backend = Arc::new(HttpBackend::new(&config)?);
        let tokens = Box::new(SqliteTokenStore::new(db));
        Ok(Self::new(config, backend, tokens))
    }

    /// Startup sequence: restore the stored session and, when it verifies,
    /// fetch the user's notebooks. A failed fetch is left on the store's
    /// load state for the UI to show.
    pub async fn startup(&mut self) -> SessionState {
        let state = self.session.restore().await;
        if let SessionState::Authenticated(user) = &state {
            self.attach_user(user).await;
        }
        state
    }

    /// Verifies `token`, signs the user in and fetches their notebooks.
    pub async fn login(&mut self, token: &str) -> Result<UserInfo, AppError> {
        self.detach_user();
        let user = self.session.login(token).await?;
        self.attach_user(&user).await;
        Ok(user)
    }

    /// Signs out. Local notebook state and any open overlay are discarded.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.detach_user();
        self.session.logout()?;
        Ok(())
    }

    pub fn notebook_store(&self) -> Result<&NotebookStore, AppError> {
        self.notebooks
            .as_ref()
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))
    }

    pub fn notebook_store_mut(&mut self) -> Result<&mut NotebookStore, AppError> {
        self.notebooks
            .as_mut()
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))
    }

    /// Note store of the notebook currently in the overlay.
    pub fn note_store_mut(&mut self) -> Result<&mut NoteStore, AppError> {
        if self.overlay.state() == OverlayState::Closing {
            return Err(OverlayError::InvalidTransition {
                from: OverlayState::Closing.as_str(),
                action: "edit notes in",
            }
            .into());
        }
        self.overlay
            .note_store_mut()
            .ok_or(AppError::Overlay(OverlayError::NoActiveNotebook))
    }

    /// Opens a listed notebook in the overlay and fetches its notes. Returns
    /// the notebook with the notes as loaded.
    ///
    /// A failed notes fetch is returned as an error but the overlay stays
    /// open on the notes already known locally.
    pub async fn open_notebook(&mut self, id: &str) -> Result<Notebook, AppError> {
        let store = self.notebook_store()?;
        let notebook = store.select(id)?.clone();
        let user_id = store.user_id().to_string();
        self.overlay.open_with_notebook(notebook.clone(), &user_id)?;
        self.overlay.load_notes().await?;
        let notes = self
            .overlay
            .note_store()
            .map(|store| store.notes().to_vec())
            .unwrap_or_default();
        Ok(Notebook { notes, ..notebook })
    }

    /// Creates a notebook and opens it straight away. It joins the list when
    /// the overlay is closed.
    pub async fn create_and_open(&mut self, name: Option<&str>) -> Result<Notebook, AppError> {
        if self.overlay.state() != OverlayState::Closed {
            return Err(OverlayError::InvalidTransition {
                from: self.overlay.state().as_str(),
                action: "open",
            }
            .into());
        }
        let store = self.notebook_store_mut()?;
        let notebook = store.create_notebook(name).await?;
        let user_id = store.user_id().to_string();
        self.overlay.open_with_notebook(notebook.clone(), &user_id)?;
        Ok(notebook)
    }

    /// Closes the overlay, waiting out the exit animation, and commits the
    /// edited notes to the notebook list.
    pub async fn close_overlay(&mut self) -> Result<Notebook, AppError> {
        let store = self
            .notebooks
            .as_mut()
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))?;
        Ok(self.overlay.close(store).await?)
    }

    /// Routes a click outside the overlay content. When it starts closing the
    /// overlay, the close is carried through to the commit.
    pub async fn outside_click(&mut self) -> Result<OutsideClickOutcome, AppError> {
        let outcome = self.overlay.handle_outside_click();
        if outcome == OutsideClickOutcome::OverlayClosing {
            self.close_overlay().await?;
        }
        Ok(outcome)
    }

    /// Deletes a listed notebook. The notebook open in the overlay is refused,
    /// since closing the overlay would list it again.
    pub async fn delete_notebook(&mut self, id: &str) -> Result<(), AppError> {
        if self.overlay.active_notebook().is_some_and(|nb| nb.id == id) {
            return Err(NotebookError::OpenInOverlay(id.to_string()).into());
        }
        self.notebook_store_mut()?.delete_notebook(id).await?;
        Ok(())
    }

    /// Drains failed backend mutations from every store.
    pub fn take_failed_mutations(&mut self) -> Vec<FailedMutation> {
        let mut failed = Vec::new();
        if let Some(store) = self.notebooks.as_mut() {
            failed.extend(store.take_failed_mutations());
        }
        failed.extend(self.overlay.take_failed_mutations());
        failed
    }

    async fn attach_user(&mut self, user: &UserInfo) {
        let mut store = NotebookStore::new(
            self.backend.clone(),
            &user.id,
            self.config.max_notebook_name_len,
        );
        if let Err(e) = store.load_notebooks().await {
            warn!("initial notebook fetch failed: {}", e);
        }
        info!("notebook list ready for user {}", user.id);
        self.notebooks = Some(store);
    }

    fn detach_user(&mut self) {
        self.overlay.reset();
        self.notebooks = None;
    }
}
