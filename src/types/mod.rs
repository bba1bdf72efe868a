// Notes shared type definitions
// Each submodule defines types used across the application.

pub mod config;
pub mod errors;
pub mod geometry;
pub mod note;
pub mod notebook;
pub mod overlay;
pub mod session;
pub mod sync;
pub mod user;
