//! Series Builder — per-minute error time series.

use std::collections::BTreeMap;

use vigil_core::types::{LogRecord, TimeSeriesPoint};

/// Bucket label format: lexicographic order equals chronological order.
pub const BUCKET_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Bucket the given error-classified records by minute.
///
/// Only populated minutes appear (no zero-fill); buckets are strictly
/// ascending. Empty input yields an empty series.
pub fn build(error_records: &[&LogRecord]) -> Vec<TimeSeriesPoint> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for record in error_records {
        let bucket = record.timestamp.format(BUCKET_FORMAT).to_string();
        *counts.entry(bucket).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(bucket, count)| TimeSeriesPoint { bucket, count })
        .collect()
}
