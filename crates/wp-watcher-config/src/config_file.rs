use std::{env, path::PathBuf};

/// Name of the config file looked up in the working and home directories
pub const CONFIG_FILE: &str = ".wp-log-watcher.toml";

/// Load config file content from CWD first, then home, then the config directory
///
/// Searches for the config file in:
/// 1. Current working directory as .wp-log-watcher.toml
/// 2. Home directory as .wp-log-watcher.toml
/// 3. Platform config directory as config.toml
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    load_first_existing(&config_candidates())
}

/// Read the first candidate that exists and is readable
pub fn load_first_existing(candidates: &[PathBuf]) -> Option<String> {
    candidates.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    })
}

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];

    if let Some(home_config) = get_home_config_path() {
        candidates.push(home_config);
    }

    if let Ok(app_config) = crate::paths::app_config_path() {
        candidates.push(app_config);
    }

    candidates
}

/// Get the path to the config file in the home directory
///
/// Returns ~/.wp-log-watcher.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
