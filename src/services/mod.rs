// Notes services
// Services provide supporting functionality: backend access, token storage, configuration, coordinates.

pub mod api_client;
pub mod config_loader;
pub mod coordinates;
pub mod memory_backend;
pub mod token_store;
