use serde::{Deserialize, Serialize};

/// Window in which newly created notes are randomly placed, in percent.
///
/// Keeps fresh notes away from the container edges so they are not clipped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpawnBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl SpawnBounds {
    /// Placement window used by early builds of the overlay.
    pub const WIDE: SpawnBounds = SpawnBounds {
        x_min: 10.0,
        x_max: 90.0,
        y_min: 10.0,
        y_max: 90.0,
    };

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            x_min: 20.0,
            x_max: 80.0,
            y_min: 10.0,
            y_max: 70.0,
        }
    }
}

/// Process-wide configuration, built once at startup and passed to the components
/// that need it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the notes REST backend, without a trailing slash.
    pub server_url: String,
    /// Path the web shell is served under.
    pub base_path: String,
    pub animation_duration_ms: u64,
    pub request_timeout_secs: u64,
    pub spawn_bounds: SpawnBounds,
    pub max_notebook_name_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            base_path: "/notes-app/".to_string(),
            animation_duration_ms: 500,
            request_timeout_secs: 15,
            spawn_bounds: SpawnBounds::default(),
            max_notebook_name_len: 64,
        }
    }
}
