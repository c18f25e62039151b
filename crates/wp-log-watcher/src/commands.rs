//! One-shot commands: `show`, `clear`, `export`

use crate::render::render_log;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wp_debug_log_parser::DisplayOrder;
use wp_log_tail::{clear_log_file, export_log_file};
use wp_watcher_config::{paths, AppConfig};

/// Render `file` in the configured order
pub async fn show(config: &AppConfig, file: &Path, with_kinds: bool) -> Result<String> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content = String::from_utf8_lossy(&bytes);

    let order = DisplayOrder::from_newest_first(config.newest_first);
    Ok(render_log(&content, order, with_kinds))
}

pub async fn clear(file: &Path) -> Result<()> {
    clear_log_file(file)
        .await
        .with_context(|| format!("Failed to clear {}", file.display()))
}

/// Export `file`; returns the path of the copy
pub async fn export(config: &AppConfig, file: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir.or_else(|| config.export_dir.clone()) {
        Some(dir) => dir,
        None => paths::default_export_dir()?,
    };

    export_log_file(file, &dir)
        .await
        .with_context(|| format!("Failed to export {} to {}", file.display(), dir.display()))
}
