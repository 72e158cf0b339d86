//! Deploy Correlator — temporal proximity between a deployment and the
//! error-series peak.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use vigil_core::types::{CorrelationLevel, CorrelationResult, DeployEvent, TimeSeriesPoint};

use crate::series::BUCKET_FORMAT;

/// Peak within this many minutes after the deploy → High.
const HIGH_WINDOW_MINUTES: i64 = 30;
/// Peak within this many minutes after the deploy → at least Medium.
const MEDIUM_WINDOW_MINUTES: i64 = 60;

/// Correlate the error series with a deployment event.
///
/// No series or no deploy timestamp yields `Unknown` with no impact. The
/// peak is the first bucket attaining the maximum count; ties break to the
/// earliest bucket. An unparseable peak bucket yields the conservative
/// `Medium`/impact fallback — deliberately distinct from the
/// missing-timestamp rule, and lossy: it asserts impact without evidence of
/// timing.
pub fn correlate(series: &[TimeSeriesPoint], deploy: Option<&DeployEvent>) -> CorrelationResult {
    let peak = series.iter().max_by_key(|p| p.count);
    let peak_error_count = peak.map(|p| p.count).unwrap_or(0);

    let deploy_time = match deploy.and_then(|d| d.timestamp) {
        Some(ts) => ts,
        None => return CorrelationResult::unknown(peak_error_count),
    };
    if series.is_empty() {
        return CorrelationResult::unknown(peak_error_count);
    }

    // First bucket achieving the maximum count.
    let peak_bucket = series
        .iter()
        .find(|p| p.count == peak_error_count)
        .map(|p| p.bucket.as_str())
        .unwrap_or_default();

    let peak_time = match parse_bucket(peak_bucket) {
        Some(ts) => ts,
        None => {
            // Conservative fallback: unparseable peak asserts impact.
            return CorrelationResult {
                correlation: CorrelationLevel::Medium,
                minutes_after_deploy: None,
                peak_error_count,
                deploy_impact: true,
            };
        }
    };

    let minutes_after_deploy = (peak_time - deploy_time).num_minutes();

    let correlation = if (0..=HIGH_WINDOW_MINUTES).contains(&minutes_after_deploy) {
        CorrelationLevel::High
    } else if minutes_after_deploy > HIGH_WINDOW_MINUTES
        && minutes_after_deploy <= MEDIUM_WINDOW_MINUTES
    {
        CorrelationLevel::Medium
    } else {
        CorrelationLevel::Low
    };

    CorrelationResult {
        correlation,
        minutes_after_deploy: Some(minutes_after_deploy),
        peak_error_count,
        deploy_impact: correlation == CorrelationLevel::High,
    }
}

/// Parse a `YYYY-MM-DD HH:MM` bucket label as UTC.
fn parse_bucket(bucket: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(&format!("{bucket}:00"), &format!("{BUCKET_FORMAT}:%S"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn point(bucket: &str, count: u64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            bucket: bucket.to_string(),
            count,
        }
    }

    fn deploy_at(iso: &str) -> DeployEvent {
        DeployEvent {
            sha: "abc123".to_string(),
            timestamp: Some(iso.parse().unwrap()),
            message: None,
            changed_files: Vec::new(),
        }
    }

    /// Build a deploy whose timestamp sits `minutes` before the given peak
    /// bucket.
    fn deploy_minutes_before(peak_bucket: &str, minutes: i64) -> DeployEvent {
        let peak = parse_bucket(peak_bucket).unwrap();
        DeployEvent {
            sha: "abc123".to_string(),
            timestamp: Some(peak - Duration::minutes(minutes)),
            message: None,
            changed_files: Vec::new(),
        }
    }

    #[test]
    fn empty_series_is_unknown() {
        let result = correlate(&[], Some(&deploy_at("2023-10-26T12:00:00Z")));
        assert_eq!(result.correlation, CorrelationLevel::Unknown);
        assert!(!result.deploy_impact);
        assert_eq!(result.peak_error_count, 0);
    }

    #[test]
    fn missing_deploy_timestamp_is_unknown() {
        let series = vec![point("2023-10-26 12:10", 6)];
        let deploy = DeployEvent::new("abc123");
        let result = correlate(&series, Some(&deploy));
        assert_eq!(result.correlation, CorrelationLevel::Unknown);
        assert!(!result.deploy_impact);
        assert_eq!(result.peak_error_count, 6);
    }

    #[test]
    fn boundary_minutes_classify_per_window() {
        let series = vec![point("2023-10-26 12:00", 4)];
        let cases: [(i64, CorrelationLevel); 5] = [
            (30, CorrelationLevel::High),
            (31, CorrelationLevel::Medium),
            (60, CorrelationLevel::Medium),
            (61, CorrelationLevel::Low),
            (-5, CorrelationLevel::Low),
        ];
        for (minutes, expected) in cases {
            let deploy = deploy_minutes_before("2023-10-26 12:00", minutes);
            let result = correlate(&series, Some(&deploy));
            assert_eq!(result.correlation, expected, "minutes={minutes}");
            assert_eq!(result.minutes_after_deploy, Some(minutes));
            assert_eq!(result.deploy_impact, expected == CorrelationLevel::High);
        }
    }

    #[test]
    fn peak_ties_break_to_earliest_bucket() {
        let series = vec![
            point("2023-10-26 12:05", 6),
            point("2023-10-26 12:45", 6),
            point("2023-10-26 12:50", 2),
        ];
        let deploy = deploy_at("2023-10-26T12:00:00Z");
        let result = correlate(&series, Some(&deploy));
        // Peak resolves to 12:05, not 12:45.
        assert_eq!(result.minutes_after_deploy, Some(5));
        assert_eq!(result.correlation, CorrelationLevel::High);
        assert!(result.deploy_impact);
    }

    #[test]
    fn unparseable_peak_bucket_falls_back_to_medium_impact() {
        let series = vec![point("not-a-bucket", 3)];
        let deploy = deploy_at("2023-10-26T12:00:00Z");
        let result = correlate(&series, Some(&deploy));
        assert_eq!(result.correlation, CorrelationLevel::Medium);
        assert!(result.deploy_impact);
        assert_eq!(result.minutes_after_deploy, None);
        assert_eq!(result.peak_error_count, 3);
    }

    #[test]
    fn error_preceding_deploy_is_low_not_impactful() {
        let series = vec![point("2023-10-26 11:00", 9)];
        let deploy = deploy_at("2023-10-26T12:00:00Z");
        let result = correlate(&series, Some(&deploy));
        assert_eq!(result.correlation, CorrelationLevel::Low);
        assert!(!result.deploy_impact);
        assert_eq!(result.minutes_after_deploy, Some(-60));
    }
}
