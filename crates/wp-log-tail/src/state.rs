//! Per-file size bookkeeping

use std::path::{Path, PathBuf};

/// Result of comparing a file's current size with the last confirmed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeChange {
    /// Bytes `[from, to)` were appended
    Grew { from: u64, to: u64 },

    /// The file shrank, usually because it was cleared
    Truncated { from: u64, to: u64 },

    Unchanged,
}

/// Last confirmed byte length of a watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailState {
    path: PathBuf,
    last_known_size: u64,
}

impl TailState {
    pub fn new(path: impl Into<PathBuf>, initial_size: u64) -> Self {
        Self {
            path: path.into(),
            last_known_size: initial_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_known_size(&self) -> u64 {
        self.last_known_size
    }

    /// Classify `current_size` against the last confirmed size
    pub fn compare(&self, current_size: u64) -> SizeChange {
        let last = self.last_known_size;
        if current_size > last {
            SizeChange::Grew {
                from: last,
                to: current_size,
            }
        } else if current_size < last {
            SizeChange::Truncated {
                from: last,
                to: current_size,
            }
        } else {
            SizeChange::Unchanged
        }
    }

    /// Record `size` as read (or as the new size after truncation)
    pub fn confirm(&mut self, size: u64) {
        self.last_known_size = size;
    }
}
