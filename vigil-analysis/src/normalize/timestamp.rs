//! Timestamp resolution for raw records.
//!
//! Resolution order: explicit field value, then an ISO-8601 substring found
//! anywhere in the raw text, then the injected clock. The caller records
//! which step succeeded so fallback buckets stay reproducible under a
//! pinned test clock.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

/// Epoch values at or above this are milliseconds; below, seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

fn iso_substring_re() -> &'static Regex {
    static ISO_SUBSTRING_RE: OnceLock<Regex> = OnceLock::new();
    ISO_SUBSTRING_RE.get_or_init(|| {
        Regex::new(
            r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?",
        )
        .expect("valid iso substring regex")
    })
}

/// Parse an explicit timestamp field: ISO-8601 text or integer epoch.
pub fn parse_field(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_iso(s),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            from_epoch(raw)
        }
        _ => None,
    }
}

/// Find and parse the first ISO-8601 substring in arbitrary text.
pub fn scan_text(text: &str) -> Option<DateTime<Utc>> {
    let found = iso_substring_re().find(text)?;
    parse_iso(found.as_str())
}

/// Parse one ISO-8601 token, with or without offset or fractional seconds.
/// Naive values are taken as UTC.
pub fn parse_iso(token: &str) -> Option<DateTime<Utc>> {
    let trimmed = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw >= EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}
