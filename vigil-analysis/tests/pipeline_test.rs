//! End-to-end pipeline scenarios.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use vigil_analysis::AnalysisPipeline;
use vigil_core::config::AnalysisConfig;
use vigil_core::traits::FixedClock;
use vigil_core::types::{
    AnalysisBatch, CorrelationLevel, DeployEvent, Priority, RawRecord, Severity,
};

fn pipeline_at(instant: &str) -> AnalysisPipeline {
    let clock = FixedClock(instant.parse::<DateTime<Utc>>().unwrap());
    AnalysisPipeline::with_clock(AnalysisConfig::default(), Arc::new(clock))
}

fn map_record(level: &str, message: &str, iso_timestamp: &str) -> RawRecord {
    let mut map = Map::new();
    map.insert("logLevel".to_string(), Value::from(level));
    map.insert("message".to_string(), Value::from(message));
    map.insert("timestamp".to_string(), Value::from(iso_timestamp));
    RawRecord::Map(map)
}

/// Batch of 8 records, 6 at ERROR level within one minute bucket, deploy 10
/// minutes earlier.
#[test]
fn error_burst_after_deploy_produces_rollback_recommendation() {
    let pipeline = pipeline_at("2023-10-26T13:00:00Z");

    let mut records = Vec::new();
    for i in 0..6 {
        records.push(map_record(
            "ERROR",
            &format!("Payment gateway failure variant {i}"),
            &format!("2023-10-26T12:10:{:02}Z", i * 7),
        ));
    }
    records.push(map_record("INFO", "request served", "2023-10-26T12:09:00Z"));
    records.push(map_record("INFO", "request served", "2023-10-26T12:11:00Z"));

    let deploy = DeployEvent {
        sha: "abc123".to_string(),
        timestamp: Some("2023-10-26T12:00:00Z".parse().unwrap()),
        message: Some("tighten timeouts".to_string()),
        changed_files: vec!["payment.py".to_string()],
    };

    let result = pipeline
        .run(&AnalysisBatch::new(records, Some(deploy)))
        .unwrap();

    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].bucket, "2023-10-26 12:10");
    assert_eq!(result.series[0].count, 6);

    assert_eq!(result.correlation.correlation, CorrelationLevel::High);
    assert!(result.correlation.deploy_impact);
    assert_eq!(result.correlation.minutes_after_deploy, Some(10));
    assert_eq!(result.correlation.peak_error_count, 6);

    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.stats.total_errors, 6);

    let rollback = &result.recommendations[0];
    assert_eq!(rollback.priority, Priority::Critical);
    assert!(rollback.action.contains("abc123"));
    assert!(rollback.reason.contains("10 minutes"));
}

/// Empty batch, no deploy event: degraded but well-formed output.
#[test]
fn empty_batch_yields_low_severity_empty_result() {
    let pipeline = pipeline_at("2023-10-26T13:00:00Z");

    let result = pipeline.run(&AnalysisBatch::empty()).unwrap();

    assert!(result.series.is_empty());
    assert!(result.clusters.is_empty());
    assert!(result.file_hits.is_empty());
    assert!(result.recommendations.is_empty());
    assert_eq!(result.severity, Severity::Low);
    assert_eq!(result.correlation.correlation, CorrelationLevel::Unknown);
    assert!(result.validation.valid);
    assert_eq!(result.stats.total_errors, 0);
}

/// Two records differing only in a numeric literal share a signature and
/// both implicate `app.py`.
#[test]
fn numeric_variants_cluster_together_and_hit_the_same_file() {
    let pipeline = pipeline_at("2023-10-26T13:00:00Z");

    let records = vec![
        map_record("ERROR", "Error at line 42 in app.py", "2023-10-26T12:00:01Z"),
        map_record("ERROR", "Error at line 99 in app.py", "2023-10-26T12:00:30Z"),
    ];

    let result = pipeline.run(&AnalysisBatch::new(records, None)).unwrap();

    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].member_count, 2);
    assert_eq!(
        result.clusters[0].exemplar.message,
        "Error at line 42 in app.py"
    );
    assert_eq!(result.file_hits.get("app.py"), Some(&2));
}

/// Running twice on the same batch with the same pinned clock yields
/// byte-identical serialized results.
#[test]
fn reruns_with_a_pinned_clock_are_byte_identical() {
    let records = vec![
        map_record("ERROR", "DynamoDB operation failed", "2023-10-26T12:00:05Z"),
        RawRecord::from("2023-10-26T12:00:20Z WARN throttling detected: Rate exceeded"),
        RawRecord::from("free-form line with no timestamp"),
    ];
    let deploy = DeployEvent {
        sha: "abc123".to_string(),
        timestamp: Some("2023-10-26T11:50:00Z".parse().unwrap()),
        message: None,
        changed_files: vec!["db.rs".to_string()],
    };
    let batch = AnalysisBatch::new(records, Some(deploy));

    let first = pipeline_at("2023-10-26T13:00:00Z").run(&batch).unwrap();
    let second = pipeline_at("2023-10-26T13:00:00Z").run(&batch).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

/// Records with unparseable timestamps land in the pinned-clock bucket, so
/// the series stays reproducible for testing.
#[test]
fn fallback_timestamps_bucket_at_the_injected_clock() {
    let pipeline = pipeline_at("2023-10-26T13:30:00Z");

    let records = vec![
        RawRecord::from("error: something exploded"),
        RawRecord::from("error: something else exploded"),
    ];

    let result = pipeline.run(&AnalysisBatch::new(records, None)).unwrap();
    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].bucket, "2023-10-26 13:30");
    assert_eq!(result.series[0].count, 2);
}

/// Deploy without a timestamp degrades correlation, not the run.
#[test]
fn deploy_without_timestamp_degrades_to_unknown() {
    let pipeline = pipeline_at("2023-10-26T13:00:00Z");

    let records = vec![map_record(
        "ERROR",
        "boom",
        "2023-10-26T12:00:05Z",
    )];
    let result = pipeline
        .run(&AnalysisBatch::new(records, Some(DeployEvent::new("abc123"))))
        .unwrap();

    assert_eq!(result.correlation.correlation, CorrelationLevel::Unknown);
    assert!(!result.correlation.deploy_impact);
    // The run itself still classifies and recommends.
    assert_eq!(result.severity, Severity::Medium);
    assert!(!result.recommendations.is_empty());
}

/// Concurrent batch runs are independent.
#[test]
fn run_many_matches_individual_runs() {
    let pipeline = pipeline_at("2023-10-26T13:00:00Z");

    let batches: Vec<AnalysisBatch> = (0..4)
        .map(|i| {
            AnalysisBatch::new(
                vec![map_record(
                    "ERROR",
                    &format!("failure {i}"),
                    "2023-10-26T12:00:05Z",
                )],
                None,
            )
        })
        .collect();

    let many: Vec<_> = pipeline
        .run_many(&batches)
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    for (batch, from_many) in batches.iter().zip(&many) {
        let solo = pipeline.run(batch).unwrap();
        assert_eq!(
            serde_json::to_string(&solo).unwrap(),
            serde_json::to_string(from_many).unwrap()
        );
    }
}

/// Exemplar cap truncates in first-seen order.
#[test]
fn exemplar_cap_preserves_first_seen_diversity() {
    let config = AnalysisConfig {
        max_exemplars: Some(2),
        ..Default::default()
    };
    let clock = FixedClock("2023-10-26T13:00:00Z".parse::<DateTime<Utc>>().unwrap());
    let pipeline = AnalysisPipeline::with_clock(config, Arc::new(clock));

    let base: DateTime<Utc> = "2023-10-26T12:00:00Z".parse().unwrap();
    let records: Vec<RawRecord> = (0..4)
        .map(|i| {
            map_record(
                "ERROR",
                &format!("distinct failure kind {}", ('a'..='z').nth(i).unwrap()),
                &(base + Duration::seconds(i as i64)).to_rfc3339(),
            )
        })
        .collect();

    let result = pipeline.run(&AnalysisBatch::new(records, None)).unwrap();
    assert_eq!(result.clusters.len(), 2);
    assert_eq!(result.stats.unique_signatures, 4);
    assert!(result.clusters[0].exemplar.message.contains("kind a"));
    assert!(result.clusters[1].exemplar.message.contains("kind b"));
}
