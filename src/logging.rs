//! Logger bootstrap.
//!
//! stdout carries the RPC stream, so log records go to stderr.

use env_logger::{Builder, Env, Target};

/// Installs the `env_logger` backend. `RUST_LOG` overrides the default level.
/// Calling this again after a logger is installed does nothing.
pub fn init_logging() {
    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .try_init();
}
