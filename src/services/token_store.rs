//! Persistence of the identity provider's bearer token.
//!
//! Only one value is ever stored, under [`TOKEN_STORAGE_KEY`].

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Local-storage key holding the identity token.
pub const TOKEN_STORAGE_KEY: &str = "google_id_token";

/// Trait defining token persistence operations.
pub trait TokenStoreTrait {
    fn load_token(&self) -> Result<Option<String>, StorageError>;
    fn save_token(&mut self, token: &str) -> Result<(), StorageError>;
    fn clear_token(&mut self) -> Result<(), StorageError>;
}

/// Token store backed by the SQLite `local_storage` table.
pub struct SqliteTokenStore {
    db: Arc<Database>,
}

impl SqliteTokenStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl TokenStoreTrait for SqliteTokenStore {
    fn load_token(&self) -> Result<Option<String>, StorageError> {
        let result = self.db.connection().query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            params![TOKEN_STORAGE_KEY],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(token) => Ok(Some(token)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::DatabaseError(e.to_string())),
        }
    }

    fn save_token(&mut self, token: &str) -> Result<(), StorageError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![TOKEN_STORAGE_KEY, token, now],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn clear_token(&mut self) -> Result<(), StorageError> {
        self.db
            .connection()
            .execute(
                "DELETE FROM local_storage WHERE key = ?1",
                params![TOKEN_STORAGE_KEY],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStoreTrait for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.clone())
    }

    fn save_token(&mut self, token: &str) -> Result<(), StorageError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&mut self) -> Result<(), StorageError> {
        self.token = None;
        Ok(())
    }
}
