// Notes state managers
// Managers handle stateful operations: session, notebook list, overlay, notes of the open notebook.

pub mod note_store;
pub mod notebook_store;
pub mod overlay_controller;
pub mod session_controller;
