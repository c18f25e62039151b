//! Application configuration
//!
//! Configuration loaded from .wp-log-watcher.toml file.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from .wp-log-watcher.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Interface the dump relay binds to
    #[serde(default = "default_relay_host")]
    pub relay_host: IpAddr,

    /// Port of the dump relay HTTP/websocket server
    #[serde(default = "default_relay_port")]
    pub relay_port: u16,

    /// Start the dump relay alongside `watch`
    #[serde(default = "default_relay_enabled")]
    pub relay_enabled: bool,

    /// Largest accepted dump request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Number of dumps kept for late viewers
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Quiet period before a burst of writes counts as one change
    #[serde(default = "default_stability_window_ms")]
    pub stability_window_ms: u64,

    /// How often pending changes (and polled files) are checked
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Skip native file notifications and poll file metadata instead
    #[serde(default)]
    pub force_polling: bool,

    /// Show logs newest entry first
    #[serde(default = "default_newest_first")]
    pub newest_first: bool,

    /// Where `export` writes copies (None = downloads directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_relay_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_relay_port() -> u16 {
    9913
}

fn default_relay_enabled() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_history_capacity() -> usize {
    100
}

fn default_stability_window_ms() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_newest_first() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_host: default_relay_host(),
            relay_port: default_relay_port(),
            relay_enabled: default_relay_enabled(),
            max_body_bytes: default_max_body_bytes(),
            history_capacity: default_history_capacity(),
            stability_window_ms: default_stability_window_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            force_polling: false,
            newest_first: default_newest_first(),
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(content) => Self::parse_or_default(&content),
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        }
    }

    /// Parse TOML content, falling back to defaults on error
    pub fn parse_or_default(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn stability_window(&self) -> Duration {
        Duration::from_millis(self.stability_window_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.relay_host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.relay_port, 9913);
        assert!(config.relay_enabled);
        assert_eq!(config.max_body_bytes, 50 * 1024 * 1024);
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.stability_window(), Duration::from_millis(100));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert!(!config.force_polling);
        assert!(config.newest_first);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            relay_host = "0.0.0.0"
            relay_port = 9999
            newest_first = false
            export_dir = "/tmp/exports"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.relay_host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.relay_port, 9999);
        assert!(!config.newest_first);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
        // Other fields should use defaults
        assert_eq!(config.history_capacity, 100);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            stability_window_ms = 250
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.stability_window(), Duration::from_millis(250));
        assert_eq!(config.relay_port, 9913);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = AppConfig::parse_or_default("relay_port = \"not a number\"");
        assert_eq!(config, AppConfig::default());
    }
}
