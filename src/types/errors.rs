use std::fmt;

// === ApiError ===

/// Errors returned by the notes backend client.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, DNS).
    Network(String),
    /// The backend answered with a non-success status code.
    Status(u16, String),
    /// The response body could not be decoded into the expected shape.
    Decode(String),
    /// The backend has no record with the given ID.
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Backend network error: {}", msg),
            ApiError::Status(code, msg) => write!(f, "Backend returned {}: {}", code, msg),
            ApiError::Decode(msg) => write!(f, "Malformed backend response: {}", msg),
            ApiError::NotFound(id) => write!(f, "Backend record not found: {}", id),
        }
    }
}

impl std::error::Error for ApiError {}

// === NoteError ===

/// Errors related to sticky note operations.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteError {
    /// Note with the given ID is not in the open notebook.
    NotFound(String),
    /// Fetching the notebook's notes failed.
    LoadFailed(String),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::NotFound(id) => write!(f, "Note not found: {}", id),
            NoteError::LoadFailed(msg) => write!(f, "Failed to load notes: {}", msg),
        }
    }
}

impl std::error::Error for NoteError {}

// === NotebookError ===

/// Errors related to notebook list operations.
#[derive(Debug, Clone, PartialEq)]
pub enum NotebookError {
    /// Notebook with the given ID was not found.
    NotFound(String),
    /// The proposed notebook name is empty or too long.
    InvalidName(String),
    /// A rename is required to be in progress but none is.
    NotEditing,
    /// The notebook is being renamed and cannot be opened or renamed again.
    AlreadyEditing(String),
    /// Fetching the notebook list failed.
    LoadFailed(String),
    /// The notebook is open in the overlay and cannot be deleted.
    OpenInOverlay(String),
}

impl fmt::Display for NotebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotebookError::NotFound(id) => write!(f, "Notebook not found: {}", id),
            NotebookError::InvalidName(msg) => write!(f, "Invalid notebook name: {}", msg),
            NotebookError::NotEditing => write!(f, "No notebook is being renamed"),
            NotebookError::AlreadyEditing(id) => {
                write!(f, "Notebook is already being renamed: {}", id)
            }
            NotebookError::LoadFailed(msg) => write!(f, "Failed to load notebooks: {}", msg),
            NotebookError::OpenInOverlay(id) => {
                write!(f, "Notebook is open in the overlay: {}", id)
            }
        }
    }
}

impl std::error::Error for NotebookError {}

// === OverlayError ===

/// Errors related to the note overlay lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// The requested transition is not allowed from the current state.
    InvalidTransition { from: &'static str, action: &'static str },
    /// The operation needs an open notebook but the overlay has none.
    NoActiveNotebook,
    /// Fetching the open notebook's notes failed.
    LoadFailed(String),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::InvalidTransition { from, action } => {
                write!(f, "Cannot {} overlay while {}", action, from)
            }
            OverlayError::NoActiveNotebook => write!(f, "No notebook is open in the overlay"),
            OverlayError::LoadFailed(msg) => write!(f, "Failed to load overlay notes: {}", msg),
        }
    }
}

impl std::error::Error for OverlayError {}

// === AuthError ===

/// Errors related to signing in and token verification.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// The backend did not accept the identity token.
    InvalidToken,
    /// Verification could not complete.
    VerificationFailed(String),
    /// The operation requires a signed-in user.
    NotAuthenticated,
    /// Reading or writing the stored token failed.
    Storage(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidToken => write!(f, "Identity token was rejected"),
            AuthError::VerificationFailed(msg) => {
                write!(f, "Token verification failed: {}", msg)
            }
            AuthError::NotAuthenticated => write!(f, "Not signed in"),
            AuthError::Storage(msg) => write!(f, "Token storage error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// === StorageError ===

/// Errors related to client-side persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Local storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

// === ConfigError ===

/// Errors related to loading the application configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    IoError(String),
    /// The config file is not valid JSON for `AppConfig`.
    ParseError(String),
    /// A config value is out of range or otherwise unusable.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// === AppError ===

/// Errors surfaced by the application glue, wrapping the component errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Auth(AuthError),
    Notebook(NotebookError),
    Note(NoteError),
    Overlay(OverlayError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Notebook(e) => write!(f, "{}", e),
            AppError::Note(e) => write!(f, "{}", e),
            AppError::Overlay(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<NotebookError> for AppError {
    fn from(e: NotebookError) -> Self {
        AppError::Notebook(e)
    }
}

impl From<NoteError> for AppError {
    fn from(e: NoteError) -> Self {
        AppError::Note(e)
    }
}

impl From<OverlayError> for AppError {
    fn from(e: OverlayError) -> Self {
        AppError::Overlay(e)
    }
}
