//! Dump payload normalization
//!
//! Senders post loosely shaped JSON. Whatever arrives is reduced to a
//! [`DumpRecord`] with a single `content` string, picked from the first
//! usable field in this order: `html`, `content`, `dump`, `data`. Anything
//! else is shown as pretty-printed JSON. Normalization never fails.

use crate::laravel::format_laravel_dump;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where in the sender's code a dump was made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpSource {
    pub file: String,
    pub line: Option<u64>,
}

impl DumpSource {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let file = object.get("file").filter(|v| is_truthy(v)).map(text_of)?;
        let line = object.get("line").and_then(|line| match line {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Some(Self { file, line })
    }
}

impl fmt::Display for DumpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// A normalized dump as stored in history and sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpRecord {
    /// RFC 3339 time, as sent or as received
    pub time: String,
    pub content: String,
    pub source: Option<DumpSource>,
}

/// The field a payload's content was taken from
#[derive(Debug, Clone, PartialEq)]
pub enum DumpPayload {
    /// Text dump to run through the Laravel/Symfony formatter
    Html(String),
    Content(String),
    Dump(String),
    Data(String),
    /// No usable field; shown as pretty-printed JSON
    Structured(Value),
    /// Body that was not JSON at all
    Raw(String),
}

impl DumpPayload {
    /// Pick the content field of a decoded payload
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Structured(value.clone());
        };

        if let Some(html) = field(object, "html") {
            Self::Html(html)
        } else if let Some(content) = field(object, "content") {
            Self::Content(content)
        } else if let Some(dump) = field(object, "dump") {
            Self::Dump(dump)
        } else if let Some(data) = field(object, "data") {
            Self::Data(data)
        } else {
            Self::Structured(value.clone())
        }
    }

    /// Render the payload as display text
    pub fn render(self) -> String {
        match self {
            Self::Html(html) => format_laravel_dump(&html),
            Self::Content(text) | Self::Dump(text) | Self::Data(text) | Self::Raw(text) => text,
            Self::Structured(value) => pretty_json(&value),
        }
    }
}

impl DumpRecord {
    /// Normalize a raw request body received at `now`
    pub fn from_body(body: &[u8], now: DateTime<Utc>) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value, now),
            Err(e) => {
                log::debug!("Dump body is not JSON, keeping it as text: {}", e);
                Self {
                    time: format_time(now),
                    content: DumpPayload::Raw(String::from_utf8_lossy(body).into_owned()).render(),
                    source: None,
                }
            }
        }
    }

    /// Normalize an already decoded payload received at `now`
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        let object = value.as_object();

        let time = object
            .and_then(|o| o.get("time"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format_time(now));

        let source = object
            .and_then(|o| o.get("source"))
            .and_then(DumpSource::from_value);

        let mut content = DumpPayload::from_value(value).render();
        if let Some(source) = &source {
            content = format!(
                r#"<div class="dump-source"><strong>Source:</strong> {}</div>{}"#,
                source, content
            );
        }

        Self {
            time,
            content,
            source,
        }
    }
}

/// Millisecond precision with a `Z` suffix, e.g. `2024-01-01T00:00:00.000Z`
fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A field counts when it holds a non-empty, non-false, non-zero value
fn field(object: &Map<String, Value>, name: &str) -> Option<String> {
    object.get(name).filter(|v| is_truthy(v)).map(text_of)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings as-is, anything else as compact JSON
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty_json(value: &Value) -> String {
    // Serializing a Value cannot fail
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
