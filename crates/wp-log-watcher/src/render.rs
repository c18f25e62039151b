//! Terminal output for log content, tail events and dumps

use wp_debug_log_parser::{reorder_entries, reorder_log, segment_entries, DisplayOrder};
use wp_dump_relay::DumpRecord;
use wp_log_tail::{Fidelity, TailEvent};

/// A full log in display order, optionally tagged with message kinds
pub fn render_log(content: &str, order: DisplayOrder, with_kinds: bool) -> String {
    if !with_kinds {
        return reorder_log(content, order);
    }

    let entries = segment_entries(content);
    let entries = match order {
        DisplayOrder::NewestFirst => reorder_entries(entries),
        DisplayOrder::OldestFirst => entries,
    };

    entries
        .iter()
        .map(|entry| format!("[{}] {}", entry.kind().label(), entry.body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_tail_event(event: &TailEvent) -> String {
    match event {
        TailEvent::NewContent {
            path,
            content,
            timestamp,
            fidelity,
        } => {
            let note = match fidelity {
                Fidelity::Exact => "",
                Fidelity::Degraded => " (polled)",
            };
            format!(
                "==> {} @ {}{} <==\n{}",
                path.display(),
                timestamp.format("%H:%M:%S"),
                note,
                content.trim_end()
            )
        }
        TailEvent::WatchError { path, error } => {
            format!("==> {} <== watch error: {}", path.display(), error)
        }
    }
}

pub fn render_dump(record: &DumpRecord) -> String {
    format!("--- dump @ {} ---\n{}", record.time, record.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const LOG: &str = "[01-Jan-2024 00:00:00 UTC] PHP Warning: Undefined index\n\
                       [01-Jan-2024 00:00:05 UTC] plain message\n";

    #[test]
    fn test_render_log_newest_first() {
        assert_eq!(
            render_log(LOG, DisplayOrder::NewestFirst, false),
            "[01-Jan-2024 00:00:05 UTC] plain message\n\n\
             [01-Jan-2024 00:00:00 UTC] PHP Warning: Undefined index"
        );
    }

    #[test]
    fn test_render_log_oldest_first_is_untouched() {
        assert_eq!(render_log(LOG, DisplayOrder::OldestFirst, false), LOG);
    }

    #[test]
    fn test_render_log_with_kinds() {
        assert_eq!(
            render_log(LOG, DisplayOrder::OldestFirst, true),
            "[warning] [01-Jan-2024 00:00:00 UTC] PHP Warning: Undefined index\n\n\
             [plain] [01-Jan-2024 00:00:05 UTC] plain message"
        );
    }

    #[test]
    fn test_render_tail_event() {
        let event = TailEvent::NewContent {
            path: PathBuf::from("/tmp/debug.log"),
            content: "line\n".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 9, 10).unwrap(),
            fidelity: Fidelity::Exact,
        };
        assert_eq!(
            render_tail_event(&event),
            "==> /tmp/debug.log @ 08:09:10 <==\nline"
        );

        let error = TailEvent::WatchError {
            path: PathBuf::from("/tmp/debug.log"),
            error: "gone".to_string(),
        };
        assert_eq!(
            render_tail_event(&error),
            "==> /tmp/debug.log <== watch error: gone"
        );
    }

    #[test]
    fn test_render_dump() {
        let record = DumpRecord {
            time: "2024-01-01T00:00:00.000Z".to_string(),
            content: "hello".to_string(),
            source: None,
        };
        assert_eq!(
            render_dump(&record),
            "--- dump @ 2024-01-01T00:00:00.000Z ---\nhello"
        );
    }
}
