//! Errors returned by the tail tracker

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while registering or operating on watched files
#[derive(Error, Debug)]
pub enum TailError {
    #[error("Already watching {}", .0.display())]
    AlreadyWatching(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),
}

impl TailError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TailError::Io {
            path: path.into(),
            source,
        }
    }
}
