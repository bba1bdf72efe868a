//! Unit tests for the local-storage database layer (connection + migrations).

use tempfile::TempDir;

use notes_app::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use notes_app::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_local_storage() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='local_storage'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "local_storage should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopening_file_keeps_schema_version() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("notes.db");
    drop(Database::open(&path).expect("first open failed"));

    let db = Database::open(&path).expect("second open failed");
    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, 1);
}
