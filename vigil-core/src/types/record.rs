//! Raw and normalized log record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One raw log record as handed to the engine.
///
/// Upstream sources emit either structured records with inconsistent keys or
/// plain text lines; the normalizer performs capability-style field lookup
/// on `Map` and pattern scans on `Text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    /// A structured record with arbitrary keys.
    Map(Map<String, Value>),
    /// A plain text log line.
    Text(String),
}

impl RawRecord {
    /// Stringified form used as the degraded message for unrecognized shapes.
    pub fn to_text(&self) -> String {
        match self {
            Self::Map(map) => Value::Object(map.clone()).to_string(),
            Self::Text(line) => line.clone(),
        }
    }
}

impl From<&str> for RawRecord {
    fn from(line: &str) -> Self {
        Self::Text(line.to_string())
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

/// Log severity level of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Level field absent or unrecognized.
    Unknown,
}

impl LogLevel {
    /// Parse a level token case-insensitively. Unrecognized tokens map to
    /// `Unknown`, never to an error.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => Self::Debug,
            "INFO" => Self::Info,
            "WARN" | "WARNING" => Self::Warn,
            "ERROR" | "ERR" => Self::Error,
            "FATAL" | "CRITICAL" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    /// Level name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a normalized record's timestamp came from.
///
/// `Ingestion` marks the injected-clock fallback so series buckets remain
/// reproducible under a pinned test clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampSource {
    /// An explicit timestamp field on the raw record.
    Field,
    /// An ISO-8601 substring found in the raw text.
    MessageScan,
    /// Ingestion time from the injected clock.
    Ingestion,
}

/// One normalized log record. Immutable after creation by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub timestamp_source: TimestampSource,
    pub level: LogLevel,
    pub message: String,
    /// Concatenation of any stack/trace fields present on the raw record.
    pub stack_text: Option<String>,
    pub source: Option<String>,
    pub error_type: Option<String>,
    pub request_id: Option<String>,
}

impl LogRecord {
    /// True if this record counts as an error for analysis purposes:
    /// level is Error/Fatal, or the message mentions an error-like token.
    pub fn is_error(&self) -> bool {
        if matches!(self.level, LogLevel::Error | LogLevel::Fatal) {
            return true;
        }
        let lower = self.message.to_lowercase();
        ["error", "exception", "fatal", "traceback"]
            .iter()
            .any(|kw| lower.contains(kw))
    }
}
