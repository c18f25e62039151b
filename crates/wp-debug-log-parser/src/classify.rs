//! Message classification
//!
//! Tags a log message with the kind of content it carries so viewers can pick
//! a highlighting style. Checks run in a fixed order and the first hit wins.

use crate::types::{MessageKind, PhpErrorKind};
use regex::Regex;
use std::sync::OnceLock;

/// Classify a log message (the text after the timestamp marker)
pub fn classify_message(message: &str) -> MessageKind {
    static PHP_ERROR_REGEX: OnceLock<Regex> = OnceLock::new();
    static FRAME_REGEX: OnceLock<Regex> = OnceLock::new();
    static FILE_PATH_REGEX: OnceLock<Regex> = OnceLock::new();

    let php_error = PHP_ERROR_REGEX.get_or_init(|| {
        Regex::new(r"^PHP (Fatal error|Warning|Notice|Parse error|Deprecated):").unwrap()
    });
    if let Some(kind) = php_error
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_php_error_kind(m.as_str()))
    {
        return MessageKind::PhpError(kind);
    }

    if message.contains("Array") && message.contains('(') && message.contains(')') {
        return MessageKind::Array;
    }

    if looks_like_json(message) {
        return MessageKind::Json;
    }

    let frame = FRAME_REGEX.get_or_init(|| Regex::new(r"^#[0-9]+").unwrap());
    if message.contains("Stack trace:") || frame.is_match(message) {
        return MessageKind::StackTrace;
    }

    let file_path =
        FILE_PATH_REGEX.get_or_init(|| Regex::new(r"/[^\s]+\.(php|js|css|html)").unwrap());
    if file_path.is_match(message) {
        return MessageKind::FilePath;
    }

    MessageKind::Plain
}

fn parse_php_error_kind(name: &str) -> Option<PhpErrorKind> {
    match name {
        "Fatal error" => Some(PhpErrorKind::Fatal),
        "Warning" => Some(PhpErrorKind::Warning),
        "Notice" => Some(PhpErrorKind::Notice),
        "Parse error" => Some(PhpErrorKind::Parse),
        "Deprecated" => Some(PhpErrorKind::Deprecated),
        _ => None,
    }
}

/// A complete JSON object or array, not just something wrapped in braces
fn looks_like_json(message: &str) -> bool {
    let trimmed = message.trim();
    let wrapped = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));

    wrapped && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_php_errors() {
        assert_eq!(
            classify_message("PHP Fatal error:  Uncaught Error: Call to undefined function"),
            MessageKind::PhpError(PhpErrorKind::Fatal)
        );
        assert_eq!(
            classify_message("PHP Warning:  Undefined array key \"foo\""),
            MessageKind::PhpError(PhpErrorKind::Warning)
        );
        assert_eq!(
            classify_message("PHP Notice:  Function _load_textdomain_just_in_time was called"),
            MessageKind::PhpError(PhpErrorKind::Notice)
        );
        assert_eq!(
            classify_message("PHP Parse error:  syntax error, unexpected token"),
            MessageKind::PhpError(PhpErrorKind::Parse)
        );
        assert_eq!(
            classify_message("PHP Deprecated:  Creation of dynamic property"),
            MessageKind::PhpError(PhpErrorKind::Deprecated)
        );
    }

    #[test]
    fn test_php_stack_trace_header_is_not_an_error() {
        assert_eq!(classify_message("PHP Stack trace:"), MessageKind::StackTrace);
    }

    #[test]
    fn test_print_r_array() {
        let message = "Array\n(\n    [0] => foo\n    [1] => bar\n)";
        assert_eq!(classify_message(message), MessageKind::Array);
    }

    #[test]
    fn test_json() {
        assert_eq!(classify_message(r#"{"user": 1, "ok": true}"#), MessageKind::Json);
        assert_eq!(classify_message("  [1, 2, 3]  "), MessageKind::Json);
    }

    #[test]
    fn test_braces_that_are_not_json() {
        assert_eq!(classify_message("{not json}"), MessageKind::Plain);
    }

    #[test]
    fn test_stack_frames() {
        assert_eq!(
            classify_message("#3 /var/www/wp-settings.php(545): include_once()"),
            MessageKind::StackTrace
        );
    }

    #[test]
    fn test_file_path() {
        assert_eq!(
            classify_message("Included from /var/www/wp-content/themes/x/functions.php"),
            MessageKind::FilePath
        );
    }

    #[test]
    fn test_plain() {
        assert_eq!(classify_message("Cron reschedule event error"), MessageKind::Plain);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(PhpErrorKind::Fatal.class_name(), "error-fatal");
        assert_eq!(PhpErrorKind::Deprecated.class_name(), "error-deprecated");
    }
}
