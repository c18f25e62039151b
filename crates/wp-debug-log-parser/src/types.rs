//! Type definitions for WordPress debug log parsing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single logical entry of a debug log
///
/// An entry starts at a line carrying a `[DD-Mon-YYYY HH:MM:SS UTC]` marker and
/// owns every following line up to the next marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Marker text without brackets, e.g. `01-Jan-2024 00:00:00 UTC`
    pub timestamp_text: Option<String>,

    /// Parsed instant of the marker (None when absent or not a real date)
    pub timestamp: Option<DateTime<Utc>>,

    /// Full trimmed entry text, starting with the marker when one is present
    pub body: String,
}

/// Kind of PHP error reported by a `PHP <Kind>:` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhpErrorKind {
    Fatal,
    Warning,
    Notice,
    Parse,
    Deprecated,
}

/// What a log message looks like, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// `PHP Fatal error: ...`, `PHP Warning: ...`, ...
    PhpError(PhpErrorKind),
    /// `print_r` style `Array ( [key] => value )` dump
    Array,
    /// A message that is a complete JSON object or array
    Json,
    /// `Stack trace:` block or `#N` frame lines
    StackTrace,
    /// Mentions a source path such as `/var/www/wp-content/plugin.php`
    FilePath,
    /// Anything else
    Plain,
}

impl LogEntry {
    /// Create an entry without a timestamp marker
    pub fn untimestamped(body: impl Into<String>) -> Self {
        Self {
            timestamp_text: None,
            timestamp: None,
            body: body.into(),
        }
    }

    /// The message text after the timestamp marker
    pub fn message(&self) -> &str {
        match self.timestamp_text {
            Some(_) => self
                .body
                .find(']')
                .map(|end| self.body[end + 1..].trim_start())
                .unwrap_or(&self.body),
            None => &self.body,
        }
    }

    /// Classify the entry's message
    pub fn kind(&self) -> MessageKind {
        crate::classify_message(self.message())
    }

    /// Whether the entry starts with a timestamp marker
    pub fn has_timestamp(&self) -> bool {
        self.timestamp_text.is_some()
    }
}

impl PhpErrorKind {
    /// CSS-style class name used by viewers to colour the entry
    pub fn class_name(&self) -> &'static str {
        match self {
            PhpErrorKind::Fatal => "error-fatal",
            PhpErrorKind::Warning => "error-warning",
            PhpErrorKind::Notice => "error-notice",
            PhpErrorKind::Parse => "error-parse",
            PhpErrorKind::Deprecated => "error-deprecated",
        }
    }
}

impl MessageKind {
    /// Short lowercase tag, e.g. `fatal`, `stack-trace`
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::PhpError(PhpErrorKind::Fatal) => "fatal",
            MessageKind::PhpError(PhpErrorKind::Warning) => "warning",
            MessageKind::PhpError(PhpErrorKind::Notice) => "notice",
            MessageKind::PhpError(PhpErrorKind::Parse) => "parse-error",
            MessageKind::PhpError(PhpErrorKind::Deprecated) => "deprecated",
            MessageKind::Array => "array",
            MessageKind::Json => "json",
            MessageKind::StackTrace => "stack-trace",
            MessageKind::FilePath => "file-path",
            MessageKind::Plain => "plain",
        }
    }
}
