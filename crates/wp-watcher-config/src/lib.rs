//! Configuration and directory paths for wp-log-watcher
//!
//! This crate provides:
//! - Directory paths for config and export files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, CONFIG_FILE};
