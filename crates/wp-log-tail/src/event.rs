//! Events delivered to the consumer of a tail tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Content reported for a change seen in degraded mode, where the appended
/// bytes are not read
pub const DEGRADED_PLACEHOLDER: &str = "[log file changed]";

/// How a file is being watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchMode {
    /// Native filesystem notifications; events carry the exact appended text
    Native,

    /// Metadata polling fallback; events only say that the file changed
    Degraded,
}

/// Whether `NewContent::content` holds the real appended text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fidelity {
    /// `content` is exactly the bytes appended since the previous event
    Exact,

    /// `content` is [`DEGRADED_PLACEHOLDER`]; re-read the file to see what changed
    Degraded,
}

/// Notification emitted by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TailEvent {
    /// New non-blank text was appended to a watched file
    NewContent {
        path: PathBuf,
        content: String,
        timestamp: DateTime<Utc>,
        fidelity: Fidelity,
    },

    /// Stat, read or watcher failure; the watch stays active
    WatchError { path: PathBuf, error: String },
}

impl TailEvent {
    /// Path of the file the event is about
    pub fn path(&self) -> &Path {
        match self {
            TailEvent::NewContent { path, .. } | TailEvent::WatchError { path, .. } => path,
        }
    }
}
