use notes_app::types::errors::*;

// === ApiError Tests ===

#[test]
fn api_error_display_variants() {
    assert_eq!(
        ApiError::Network("connection refused".to_string()).to_string(),
        "Backend network error: connection refused"
    );
    assert_eq!(
        ApiError::Status(500, "Internal Server Error".to_string()).to_string(),
        "Backend returned 500: Internal Server Error"
    );
    assert_eq!(
        ApiError::Decode("missing field `user`".to_string()).to_string(),
        "Malformed backend response: missing field `user`"
    );
    assert_eq!(
        ApiError::NotFound("nb-1".to_string()).to_string(),
        "Backend record not found: nb-1"
    );
}

#[test]
fn api_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(ApiError::Network("x".to_string()));
    assert!(err.source().is_none());
}

// === NoteError Tests ===

#[test]
fn note_error_display_variants() {
    assert_eq!(NoteError::NotFound("n-1".to_string()).to_string(), "Note not found: n-1");
    assert_eq!(
        NoteError::LoadFailed("timeout".to_string()).to_string(),
        "Failed to load notes: timeout"
    );
}

// === NotebookError Tests ===

#[test]
fn notebook_error_display_variants() {
    assert_eq!(
        NotebookError::NotFound("nb-9".to_string()).to_string(),
        "Notebook not found: nb-9"
    );
    assert_eq!(
        NotebookError::InvalidName("name must not be empty".to_string()).to_string(),
        "Invalid notebook name: name must not be empty"
    );
    assert_eq!(NotebookError::NotEditing.to_string(), "No notebook is being renamed");
    assert_eq!(
        NotebookError::AlreadyEditing("nb-2".to_string()).to_string(),
        "Notebook is already being renamed: nb-2"
    );
    assert_eq!(
        NotebookError::OpenInOverlay("nb-3".to_string()).to_string(),
        "Notebook is open in the overlay: nb-3"
    );
}

// === OverlayError Tests ===

#[test]
fn overlay_error_invalid_transition_display() {
    let err = OverlayError::InvalidTransition {
        from: "closing",
        action: "open",
    };
    assert_eq!(err.to_string(), "Cannot open overlay while closing");
    assert_eq!(
        OverlayError::NoActiveNotebook.to_string(),
        "No notebook is open in the overlay"
    );
}

// === AuthError Tests ===

#[test]
fn auth_error_display_variants() {
    assert_eq!(AuthError::InvalidToken.to_string(), "Identity token was rejected");
    assert_eq!(AuthError::NotAuthenticated.to_string(), "Not signed in");
    assert_eq!(
        AuthError::Storage("disk full".to_string()).to_string(),
        "Token storage error: disk full"
    );
}

// === StorageError / ConfigError Tests ===

#[test]
fn storage_and_config_error_display() {
    assert_eq!(
        StorageError::DatabaseError("locked".to_string()).to_string(),
        "Local storage error: locked"
    );
    assert_eq!(
        ConfigError::InvalidValue("server_url must not be empty".to_string()).to_string(),
        "Invalid config value: server_url must not be empty"
    );
}

// === AppError Tests ===

#[test]
fn app_error_wraps_component_errors_transparently() {
    let err: AppError = AuthError::NotAuthenticated.into();
    assert_eq!(err, AppError::Auth(AuthError::NotAuthenticated));
    assert_eq!(err.to_string(), "Not signed in");

    let err: AppError = NotebookError::NotEditing.into();
    assert_eq!(err.to_string(), "No notebook is being renamed");
}
