//! WordPress timestamp marker parsing
//!
//! PHP's `error_log` writes every entry as `[01-Jan-2024 00:00:00 UTC] message`.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur while turning marker text into an instant
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Not a WordPress timestamp: {0}")]
    Malformed(String),

    #[error("Unknown month abbreviation: {0}")]
    UnknownMonth(String),

    #[error("Date does not exist: {0}")]
    InvalidDate(String),
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| {
        // ASCII digits only; `\d` would also accept other Unicode digits
        Regex::new(r"^\[([0-9]{2}-[A-Za-z]{3}-[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2} UTC)\]").unwrap()
    })
}

fn fields_regex() -> &'static Regex {
    static FIELDS_REGEX: OnceLock<Regex> = OnceLock::new();
    FIELDS_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{2})-([A-Za-z]{3})-([0-9]{4}) ([0-9]{2}):([0-9]{2}):([0-9]{2}) UTC$")
            .unwrap()
    })
}

/// Split a line into its timestamp marker and the remaining text
///
/// Returns `Some((marker, rest))` where `marker` is the text between the
/// brackets, or `None` if the line does not start with a marker.
pub fn split_timestamp(line: &str) -> Option<(&str, &str)> {
    let captures = marker_regex().captures(line)?;
    let whole = captures.get(0)?;
    let inner = captures.get(1)?;
    Some((inner.as_str(), &line[whole.end()..]))
}

/// Parse marker text such as `01-Jan-2024 00:00:05 UTC` into a UTC instant
///
/// Month abbreviations are matched case-insensitively.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let captures = fields_regex()
        .captures(text.trim())
        .ok_or_else(|| TimestampError::Malformed(text.to_string()))?;

    let number = |i: usize| -> u32 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let month_name = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name))
        .ok_or_else(|| TimestampError::UnknownMonth(month_name.to_string()))?
        as u32
        + 1;

    let year = number(3) as i32;
    NaiveDate::from_ymd_opt(year, month, number(1))
        .and_then(|date| date.and_hms_opt(number(4), number(5), number(6)))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_split_timestamp() {
        let line = "[15-Mar-2024 10:30:00 UTC] PHP Warning: Undefined variable";
        let (marker, rest) = split_timestamp(line).unwrap();
        assert_eq!(marker, "15-Mar-2024 10:30:00 UTC");
        assert_eq!(rest, " PHP Warning: Undefined variable");
    }

    #[test]
    fn test_split_requires_line_start() {
        assert!(split_timestamp(" [15-Mar-2024 10:30:00 UTC] indented").is_none());
        assert!(split_timestamp("prefix [15-Mar-2024 10:30:00 UTC]").is_none());
    }

    #[test]
    fn test_split_rejects_other_zones() {
        assert!(split_timestamp("[15-Mar-2024 10:30:00 CET] local time").is_none());
        assert!(split_timestamp("[2024-03-15 10:30:00] other format").is_none());
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("01-Jan-2024 00:00:05 UTC").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap());
    }

    #[test]
    fn test_parse_month_case_insensitive() {
        let ts = parse_timestamp("31-dec-2023 23:59:59 UTC").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_unknown_month() {
        assert_eq!(
            parse_timestamp("01-Foo-2024 00:00:00 UTC"),
            Err(TimestampError::UnknownMonth("Foo".to_string()))
        );
    }

    #[test]
    fn test_impossible_date() {
        assert!(matches!(
            parse_timestamp("31-Feb-2024 00:00:00 UTC"),
            Err(TimestampError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_timestamp("01-Jan-2024 25:00:00 UTC"),
            Err(TimestampError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(TimestampError::Malformed(_))
        ));
    }
}
