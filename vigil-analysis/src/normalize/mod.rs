//! Log Normalizer — arbitrary raw record shapes to canonical `LogRecord`s.
//!
//! Normalization never fails: unrecognized shapes degrade to `Unknown`
//! level, a stringified message, and an ingestion-time timestamp.

pub mod timestamp;

use std::sync::Arc;

use serde_json::{Map, Value};

use vigil_core::traits::Clock;
use vigil_core::types::{LogLevel, LogRecord, RawRecord, TimestampSource};

/// Candidate keys tried in order for each canonical field. Upstream sources
/// disagree on naming; the first present key wins.
const LEVEL_KEYS: [&str; 4] = ["logLevel", "level", "severity", "log_level"];
const MESSAGE_KEYS: [&str; 3] = ["message", "@message", "msg"];
const STACK_KEYS: [&str; 4] = ["stackTrace", "stack_trace", "stack", "traceback"];
const SOURCE_KEYS: [&str; 2] = ["source", "origin"];
const ERROR_TYPE_KEYS: [&str; 2] = ["errorType", "error_type"];
const REQUEST_ID_KEYS: [&str; 2] = ["requestId", "request_id"];
const TIMESTAMP_KEYS: [&str; 3] = ["timestamp", "@timestamp", "time"];

/// Converts raw records into canonical `LogRecord`s.
pub struct LogNormalizer {
    clock: Arc<dyn Clock>,
}

impl LogNormalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Normalize one raw record. Total: every input shape yields a record.
    pub fn normalize(&self, raw: &RawRecord) -> LogRecord {
        match raw {
            RawRecord::Map(map) => self.normalize_map(map),
            RawRecord::Text(line) => self.normalize_text(line),
        }
    }

    fn normalize_map(&self, map: &Map<String, Value>) -> LogRecord {
        let message = first_string(map, &MESSAGE_KEYS)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string());

        let level = first_string(map, &LEVEL_KEYS)
            .map(|token| LogLevel::parse(&token))
            .unwrap_or(LogLevel::Unknown);

        let stack_text = collect_stack_text(map);

        let (timestamp, timestamp_source) = self.resolve_timestamp(map, &message, &stack_text);

        LogRecord {
            timestamp,
            timestamp_source,
            level,
            message,
            stack_text,
            source: first_string(map, &SOURCE_KEYS),
            error_type: first_string(map, &ERROR_TYPE_KEYS),
            request_id: first_string(map, &REQUEST_ID_KEYS),
        }
    }

    fn normalize_text(&self, line: &str) -> LogRecord {
        let (timestamp, timestamp_source) = match timestamp::scan_text(line) {
            Some(ts) => (ts, TimestampSource::MessageScan),
            None => (self.clock.now(), TimestampSource::Ingestion),
        };

        LogRecord {
            timestamp,
            timestamp_source,
            level: LogLevel::Unknown,
            message: line.to_string(),
            stack_text: None,
            source: None,
            error_type: None,
            request_id: None,
        }
    }

    /// Explicit field, then ISO substring in message/stack text, then the
    /// injected clock.
    fn resolve_timestamp(
        &self,
        map: &Map<String, Value>,
        message: &str,
        stack_text: &Option<String>,
    ) -> (chrono::DateTime<chrono::Utc>, TimestampSource) {
        for key in TIMESTAMP_KEYS {
            if let Some(value) = map.get(key) {
                if let Some(ts) = timestamp::parse_field(value) {
                    return (ts, TimestampSource::Field);
                }
            }
        }

        if let Some(ts) = timestamp::scan_text(message) {
            return (ts, TimestampSource::MessageScan);
        }
        if let Some(stack) = stack_text {
            if let Some(ts) = timestamp::scan_text(stack) {
                return (ts, TimestampSource::MessageScan);
            }
        }

        (self.clock.now(), TimestampSource::Ingestion)
    }
}

/// First present candidate key coerced to a non-empty string.
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.get(*key) {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Concatenate every present stack/trace field, newline-separated.
fn collect_stack_text(map: &Map<String, Value>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for key in STACK_KEYS {
        if let Some(Value::String(s)) = map.get(key) {
            if !s.is_empty() {
                parts.push(s.clone());
            }
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
