//! Newest-first presentation of debug log entries

use crate::segment::segment_entries;
use crate::types::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order in which a log is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayOrder {
    /// Entries sorted by timestamp, most recent first
    #[default]
    NewestFirst,

    /// The file exactly as written (oldest entries first)
    OldestFirst,
}

impl DisplayOrder {
    /// Build from the viewer's "show newest first" toggle
    pub fn from_newest_first(newest_first: bool) -> Self {
        if newest_first {
            DisplayOrder::NewestFirst
        } else {
            DisplayOrder::OldestFirst
        }
    }
}

/// Reorder raw log text for display
///
/// `NewestFirst` segments the text, sorts the entries and joins them with a
/// blank line. `OldestFirst` hands the input back untouched.
pub fn reorder_log(content: &str, order: DisplayOrder) -> String {
    match order {
        DisplayOrder::OldestFirst => content.to_string(),
        DisplayOrder::NewestFirst => reorder_entries(segment_entries(content))
            .iter()
            .map(|entry| entry.body.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Sort entries newest first
///
/// The sort is stable: entries with equal timestamps keep their input order.
/// Entries without a parsed timestamp never take part in a comparison. Each
/// one stays attached right after the entry that preceded it in the input,
/// and entries before the first timestamped one stay at the front.
pub fn reorder_entries(entries: Vec<LogEntry>) -> Vec<LogEntry> {
    let mut leading = Vec::new();
    let mut runs: Vec<(DateTime<Utc>, Vec<LogEntry>)> = Vec::new();

    for entry in entries {
        match entry.timestamp {
            Some(ts) => runs.push((ts, vec![entry])),
            None => match runs.last_mut() {
                Some((_, run)) => run.push(entry),
                None => leading.push(entry),
            },
        }
    }

    // `sort_by` is stable, which keeps equal timestamps in input order
    runs.sort_by(|(a, _), (b, _)| b.cmp(a));

    leading
        .into_iter()
        .chain(runs.into_iter().flat_map(|(_, run)| run))
        .collect()
}
