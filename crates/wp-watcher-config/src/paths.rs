//! Configuration and export directory paths
//!
//! Uses platform directories via `dirs` crate with fallbacks.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/wp-log-watcher/`, exports to `~/Downloads/`
//! - macOS: `~/Library/Application Support/wp-log-watcher/`, exports to `~/Downloads/`
//! - Windows: `%APPDATA%\wp-log-watcher\`, exports to `%USERPROFILE%\Downloads\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "wp-log-watcher";

/// Get the application config directory and ensure it exists
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default directory for exported log copies
///
/// Falls back to the current directory when no download directory is known.
pub fn default_export_dir() -> Result<PathBuf> {
    match dirs::download_dir() {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Could not determine current directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_exists() {
        let dir = config_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_app_config_path() {
        let path = app_config_path().unwrap();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_default_export_dir() {
        assert!(default_export_dir().is_ok());
    }
}
