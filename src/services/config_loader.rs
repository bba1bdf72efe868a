// Configuration loading.
// Reads `AppConfig` from a JSON file in the platform config directory, applies
// environment overrides, and validates the result.

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::platform;
use crate::types::config::AppConfig;
use crate::types::errors::ConfigError;

/// Environment variable overriding `server_url`.
pub const ENV_SERVER_URL: &str = "NOTES_SERVER_URL";
/// Environment variable overriding `base_path`.
pub const ENV_BASE_PATH: &str = "NOTES_BASE_PATH";

/// Trait defining the configuration loader interface.
pub trait ConfigLoaderTrait {
    fn load(&self) -> Result<AppConfig, ConfigError>;
    fn get_config_path(&self) -> &str;
}

/// Loads `AppConfig` from disk and the process environment.
pub struct ConfigLoader {
    config_path: String,
}

impl ConfigLoader {
    /// Uses `path_override` when given, otherwise `config.json` in the platform config dir.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("config.json")
                .to_string_lossy()
                .to_string(),
        };
        Self { config_path }
    }

    /// Reads the config file, or returns defaults when it does not exist.
    pub fn read_file(&self) -> Result<AppConfig, ConfigError> {
        let path = Path::new(&self.config_path);
        if !path.exists() {
            debug!("no config file at {}, using defaults", self.config_path);
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config file: {}", e)))
    }
}

impl ConfigLoaderTrait for ConfigLoader {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.read_file()?;
        apply_env_overrides(&mut config, |key| env::var(key).ok());
        validate(&config)?;
        info!(
            "config loaded from {} server_url={}",
            self.config_path, config.server_url
        );
        Ok(config)
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

/// Applies overrides from `lookup` (normally the process environment).
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.trim().is_empty()) {
        config.server_url = url.trim().to_string();
    }
    if let Some(base) = lookup(ENV_BASE_PATH).filter(|v| !v.trim().is_empty()) {
        config.base_path = base.trim().to_string();
    }
}

/// Rejects values the rest of the application cannot work with.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let url = config.server_url.trim();
    if url.is_empty() {
        return Err(ConfigError::InvalidValue("server_url must not be empty".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue(format!(
            "server_url must start with http:// or https://: {}",
            url
        )));
    }
    if config.max_notebook_name_len == 0 {
        return Err(ConfigError::InvalidValue(
            "max_notebook_name_len must be positive".to_string(),
        ));
    }

    let b = &config.spawn_bounds;
    let in_range = |v: f64| (0.0..=100.0).contains(&v);
    if ![b.x_min, b.x_max, b.y_min, b.y_max].iter().all(|v| in_range(*v)) {
        return Err(ConfigError::InvalidValue(
            "spawn_bounds must lie within [0, 100]".to_string(),
        ));
    }
    if b.x_min > b.x_max || b.y_min > b.y_max {
        return Err(ConfigError::InvalidValue(
            "spawn_bounds minimum exceeds maximum".to_string(),
        ));
    }
    Ok(())
}
