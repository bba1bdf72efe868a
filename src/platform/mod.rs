// Per-OS locations for the config file and the local-storage database.
//
// - Linux:   $XDG_CONFIG_HOME/notes-app, $XDG_DATA_HOME/notes-app
//            (falling back to ~/.config and ~/.local/share)
// - macOS:   ~/Library/Application Support/NotesApp for both
// - Windows: %APPDATA%/NotesApp for both

use std::env;
use std::path::{Path, PathBuf};

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const APP_DIR_NAME: &str = "notes-app";
#[cfg(any(target_os = "macos", target_os = "windows"))]
const APP_DIR_NAME: &str = "NotesApp";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Resolves an XDG base directory: the variable's value when set and non-empty,
/// otherwise `home` joined with `fallback`.
pub fn xdg_base_dir(xdg_value: Option<&str>, home: &Path, fallback: &[&str]) -> PathBuf {
    match xdg_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => fallback.iter().fold(home.to_path_buf(), |acc, part| acc.join(part)),
    }
}

/// Directory holding `config.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR_NAME)
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR_NAME)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let xdg = env::var("XDG_CONFIG_HOME").ok();
        xdg_base_dir(xdg.as_deref(), &home_dir(), &[".config"]).join(APP_DIR_NAME)
    }
}

/// Directory holding the local-storage database.
pub fn get_data_dir() -> PathBuf {
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let xdg = env::var("XDG_DATA_HOME").ok();
        xdg_base_dir(xdg.as_deref(), &home_dir(), &[".local", "share"]).join(APP_DIR_NAME)
    }
}
