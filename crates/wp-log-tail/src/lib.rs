//! Log File Tailing
//!
//! Watches growing log files and reports exactly the bytes appended since the
//! last check. Rapid bursts of writes are debounced into a single settled
//! change, truncation (a cleared log) resets the tracked size silently, and
//! stat/read failures are reported as events without stopping the watch.
//!
//! # Architecture
//!
//! ```text
//! notify / metadata poll ──► per-file task ──► Debouncer ──► FileTail ──► TailEvent channel
//! ```
//!
//! Each registered file is owned by exactly one task, so reads for the same
//! file never overlap and its tracked size has a single writer.
//!
//! # Example
//!
//! ```no_run
//! use wp_log_tail::{TailConfig, TailEvent, TailTracker};
//!
//! # async fn example() -> Result<(), wp_log_tail::TailError> {
//! let (mut tracker, mut events) = TailTracker::new(TailConfig::default());
//! tracker.register("/var/www/wp-content/debug.log").await?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         TailEvent::NewContent { content, .. } => print!("{}", content),
//!         TailEvent::WatchError { path, error } => eprintln!("{}: {}", path.display(), error),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod debounce;
mod error;
mod event;
mod file_ops;
mod file_tail;
mod reader;
mod state;
mod tracker;

pub use debounce::Debouncer;
pub use error::TailError;
pub use event::{Fidelity, TailEvent, WatchMode, DEGRADED_PLACEHOLDER};
pub use file_ops::{clear_log_file, export_file_name, export_log_file};
pub use file_tail::FileTail;
pub use reader::read_range;
pub use state::{SizeChange, TailState};
pub use tracker::{TailConfig, TailTracker};
