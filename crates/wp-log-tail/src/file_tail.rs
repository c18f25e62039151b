//! Tail Tracker for a single file
//!
//! Turns a settled change into at most one [`TailEvent`], following the size
//! rules:
//! - grew: read the appended range, report it if it is not blank
//! - shrank: the file was truncated; adopt the new size, report nothing
//! - unchanged: nothing to do

use crate::event::{Fidelity, TailEvent, DEGRADED_PLACEHOLDER};
use crate::reader::read_range;
use crate::state::{SizeChange, TailState};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tail state for one watched file plus the logic that advances it
#[derive(Debug)]
pub struct FileTail {
    state: TailState,
    /// Modification time seen by the last degraded-mode check
    last_modified: Option<SystemTime>,
}

impl FileTail {
    /// Start tailing `path` from its current end
    ///
    /// A missing or unreadable file starts at size 0; that is logged and not
    /// treated as an error so the file can be created later.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (size, modified) = match tokio::fs::metadata(&path).await {
            Ok(meta) => (meta.len(), meta.modified().ok()),
            Err(e) => {
                log::warn!("Could not stat {}, starting at 0: {}", path.display(), e);
                (0, None)
            }
        };

        log::debug!("Tail: seeding {} at offset {}", path.display(), size);

        Self {
            state: TailState::new(path, size),
            last_modified: modified,
        }
    }

    pub fn path(&self) -> &Path {
        self.state.path()
    }

    pub fn state(&self) -> &TailState {
        &self.state
    }

    /// Process one settled change, reading the appended bytes
    pub async fn check(&mut self) -> Option<TailEvent> {
        let current_size = match tokio::fs::metadata(self.path()).await {
            Ok(meta) => meta.len(),
            Err(e) => return Some(self.error(format!("Failed to stat file: {}", e))),
        };

        match self.state.compare(current_size) {
            SizeChange::Grew { from, to } => {
                let content = match read_range(self.path(), from, to).await {
                    Ok(content) => content,
                    Err(e) => return Some(self.error(format!("Failed to read file: {}", e))),
                };

                self.state.confirm(to);

                if content.trim().is_empty() {
                    log::trace!("Tail: {} grew by whitespace only", self.path().display());
                    return None;
                }

                Some(TailEvent::NewContent {
                    path: self.path().to_path_buf(),
                    content,
                    timestamp: Utc::now(),
                    fidelity: Fidelity::Exact,
                })
            }
            SizeChange::Truncated { from, to } => {
                log::info!(
                    "Tail: {} truncated from {} to {} bytes",
                    self.path().display(),
                    from,
                    to
                );
                self.state.confirm(to);
                None
            }
            SizeChange::Unchanged => None,
        }
    }

    /// Process one settled change without reading file content
    ///
    /// Used by the polling fallback. Growth, or a rewrite that kept the size,
    /// is reported with a placeholder instead of the appended text.
    pub async fn check_degraded(&mut self) -> Option<TailEvent> {
        let meta = match tokio::fs::metadata(self.path()).await {
            Ok(meta) => meta,
            Err(e) => return Some(self.error(format!("Failed to stat file: {}", e))),
        };

        let modified = meta.modified().ok();
        let touched = modified != self.last_modified;
        self.last_modified = modified;

        let changed = match self.state.compare(meta.len()) {
            SizeChange::Grew { to, .. } => {
                self.state.confirm(to);
                true
            }
            SizeChange::Truncated { to, .. } => {
                self.state.confirm(to);
                false
            }
            SizeChange::Unchanged => touched,
        };

        changed.then(|| TailEvent::NewContent {
            path: self.path().to_path_buf(),
            content: DEGRADED_PLACEHOLDER.to_string(),
            timestamp: Utc::now(),
            fidelity: Fidelity::Degraded,
        })
    }

    fn error(&self, error: String) -> TailEvent {
        log::warn!("Tail: {}: {}", self.path().display(), error);
        TailEvent::WatchError {
            path: self.path().to_path_buf(),
            error,
        }
    }
}
