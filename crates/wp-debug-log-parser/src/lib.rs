//! WordPress Debug Log Parser
//!
//! A library for parsing WordPress/PHP `debug.log` files: splitting the raw
//! text into timestamped entries, presenting them newest-first, and tagging
//! each message with the kind of content it carries (PHP error, stack trace,
//! `print_r` array, JSON, ...).
//!
//! # Example
//!
//! ```
//! use wp_debug_log_parser::{reorder_log, segment_entries, DisplayOrder};
//!
//! let raw = "[01-Jan-2024 00:00:00 UTC] Error A\n[01-Jan-2024 00:00:05 UTC] Error B\n";
//!
//! let entries = segment_entries(raw);
//! assert_eq!(entries.len(), 2);
//!
//! let newest_first = reorder_log(raw, DisplayOrder::NewestFirst);
//! assert!(newest_first.starts_with("[01-Jan-2024 00:00:05 UTC] Error B"));
//! ```

mod classify;
mod reorder;
mod segment;
mod timestamp;
mod types;

pub use classify::classify_message;
pub use reorder::{reorder_entries, reorder_log, DisplayOrder};
pub use segment::segment_entries;
pub use timestamp::{parse_timestamp, split_timestamp, TimestampError};
pub use types::*;
