//! Unit tests for bearer token persistence.

use std::sync::Arc;

use tempfile::TempDir;

use notes_app::database::Database;
use notes_app::services::token_store::{MemoryTokenStore, SqliteTokenStore, TokenStoreTrait, TOKEN_STORAGE_KEY};

fn sqlite_store() -> (SqliteTokenStore, Arc<Database>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db = Arc::new(Database::open(tmp.path().join("notes.db")).expect("Failed to open db"));
    (SqliteTokenStore::new(db.clone()), db, tmp)
}

#[test]
fn test_sqlite_store_starts_empty() {
    let (store, _db, _tmp) = sqlite_store();
    assert_eq!(store.load_token().unwrap(), None);
}

#[test]
fn test_sqlite_store_save_overwrites_single_key() {
    let (mut store, db, _tmp) = sqlite_store();
    store.save_token("first").unwrap();
    store.save_token("second").unwrap();

    assert_eq!(store.load_token().unwrap().as_deref(), Some("second"));
    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    let key: String = db
        .connection()
        .query_row("SELECT key FROM local_storage", [], |row| row.get(0))
        .unwrap();
    assert_eq!(key, TOKEN_STORAGE_KEY);
}

#[test]
fn test_sqlite_store_clear_removes_token() {
    let (mut store, _db, _tmp) = sqlite_store();
    store.save_token("abc").unwrap();
    store.clear_token().unwrap();
    assert_eq!(store.load_token().unwrap(), None);
    // Clearing an empty store is fine.
    store.clear_token().unwrap();
}

#[test]
fn test_sqlite_token_survives_reopen() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("notes.db");
    {
        let db = Arc::new(Database::open(&path).unwrap());
        SqliteTokenStore::new(db).save_token("persisted").unwrap();
    }
    let db = Arc::new(Database::open(&path).unwrap());
    let store = SqliteTokenStore::new(db);
    assert_eq!(store.load_token().unwrap().as_deref(), Some("persisted"));
}

#[test]
fn test_memory_store_roundtrip() {
    let mut store = MemoryTokenStore::new();
    assert_eq!(store.load_token().unwrap(), None);
    store.save_token("t").unwrap();
    assert_eq!(store.load_token().unwrap().as_deref(), Some("t"));
    store.clear_token().unwrap();
    assert_eq!(store.load_token().unwrap(), None);
}
