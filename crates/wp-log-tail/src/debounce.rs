//! Change Debouncer
//!
//! Line-buffered writers produce a burst of filesystem notifications per
//! logical write. The debouncer collapses such a burst into one settled
//! change, issued once a path has been quiet for the whole stability window.
//! This is a debounce, not a throttle: a path that keeps changing never
//! settles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// Coalesces change notifications per path
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    /// Time of the most recent notification for each unsettled path
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Note a change notification for `path` seen at `now`
    ///
    /// Restarts the stability window for that path.
    pub fn record(&mut self, path: &Path, now: Instant) {
        self.pending.insert(path.to_path_buf(), now);
    }

    /// Remove and return every path that has been quiet for the full window
    pub fn take_settled(&mut self, now: Instant) -> Vec<PathBuf> {
        let window = self.window;
        let settled: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= window)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &settled {
            self.pending.remove(path);
        }

        settled
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }

    /// Earliest instant at which some pending path settles
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().map(|last| *last + self.window)
    }
}
