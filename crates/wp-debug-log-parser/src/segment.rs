//! Splitting a debug log into entries

use crate::timestamp::{parse_timestamp, split_timestamp};
use crate::types::LogEntry;

/// Split raw debug log text into entries
///
/// A new entry begins at every line that starts with a timestamp marker.
/// Lines without a marker (stack trace frames, `print_r` output, blank lines)
/// continue the entry that is currently open. Text before the first marker
/// becomes an entry without a timestamp.
///
/// Entries are trimmed and blank entries are dropped, so blank input yields
/// no entries and input without any marker yields exactly one.
///
/// # Example
///
/// ```
/// # use wp_debug_log_parser::segment_entries;
/// let entries = segment_entries("[01-Jan-2024 00:00:00 UTC] PHP Fatal error: boom\nStack trace:\n#0 {main}\n");
/// assert_eq!(entries.len(), 1);
/// assert!(entries[0].body.ends_with("#0 {main}"));
/// ```
pub fn segment_entries(content: &str) -> Vec<LogEntry> {
    let mut builder = EntryBuilder::new();

    for line in content.split('\n') {
        match split_timestamp(line) {
            Some((marker, _)) => builder.start(line, marker),
            None => builder.continue_with(line),
        }
    }

    builder.finish()
}

/// Accumulates lines into the currently open entry
struct EntryBuilder {
    entries: Vec<LogEntry>,
    marker: Option<String>,
    text: String,
}

impl EntryBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            marker: None,
            text: String::new(),
        }
    }

    fn start(&mut self, line: &str, marker: &str) {
        self.flush();
        self.marker = Some(marker.to_string());
        self.text.push_str(line);
    }

    fn continue_with(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    fn flush(&mut self) {
        let marker = self.marker.take();
        let body = self.text.trim();

        if !body.is_empty() {
            let timestamp = marker.as_deref().and_then(|m| match parse_timestamp(m) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    log::debug!("Keeping entry without a usable timestamp: {}", e);
                    None
                }
            });

            self.entries.push(LogEntry {
                timestamp_text: marker,
                timestamp,
                body: body.to_string(),
            });
        }

        self.text.clear();
    }

    fn finish(mut self) -> Vec<LogEntry> {
        self.flush();
        self.entries
    }
}
