//! Configuration and log paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/webscenario/`
//! - macOS: `~/Library/Application Support/webscenario/`
//! - Windows: `%APPDATA%\webscenario\`

use std::io;
use std::path::PathBuf;

/// Application name used for config and data directories
const APP_NAME: &str = "webscenario";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Ensure the log directory exists
pub fn ensure_log_dir() -> io::Result<Option<PathBuf>> {
    match log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            Ok(Some(dir))
        }
        None => Ok(None),
    }
}
