//! Client-side persisted state.
//!
//! A small SQLite file stands in for browser local storage: one
//! `local_storage` key/value table, created on open.
//!
//! ```no_run
//! use notes_app::database::Database;
//!
//! let db = Database::open("notes.db").expect("failed to open database");
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
