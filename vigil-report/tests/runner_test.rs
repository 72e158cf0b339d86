//! Tests for the incident runner's orchestration and degradation behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use vigil_analysis::AnalysisPipeline;
use vigil_core::config::{AnalysisConfig, ReportConfig};
use vigil_core::errors::{ReportError, StorageError, VigilErrorCode};
use vigil_core::traits::FixedClock;
use vigil_core::types::{AnalysisBatch, AnalysisResult, DeployEvent, RawRecord};
use vigil_report::prompt::NarrativePrompt;
use vigil_report::render::RenderedMessage;
use vigil_report::{
    DeliveryStatus, IncidentRunner, IssuePayload, IssueTracker, NotificationTarget, Notifier,
    Summarizer,
};
use vigil_storage::{DocumentStore, MemoryStore};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        "2023-10-26T13:00:00Z".parse::<DateTime<Utc>>().unwrap(),
    ))
}

fn analyzed_incident() -> AnalysisResult {
    let pipeline = AnalysisPipeline::with_clock(AnalysisConfig::default(), clock());

    let mut records = Vec::new();
    for i in 0..6 {
        let mut map = Map::new();
        map.insert("logLevel".to_string(), Value::from("ERROR"));
        map.insert(
            "message".to_string(),
            Value::from(format!("RDS connection failed, attempt {i}")),
        );
        map.insert(
            "timestamp".to_string(),
            Value::from(format!("2023-10-26T12:10:{i:02}Z")),
        );
        records.push(RawRecord::Map(map));
    }

    let deploy = DeployEvent {
        sha: "abc123".to_string(),
        timestamp: Some("2023-10-26T12:00:00Z".parse().unwrap()),
        message: None,
        changed_files: vec!["db.rs".to_string()],
    };

    pipeline
        .run(&AnalysisBatch::new(records, Some(deploy)))
        .unwrap()
}

struct FailingStore;

impl DocumentStore for FailingStore {
    fn put(&self, _key: &str, _document: &Value) -> Result<(), StorageError> {
        Err(StorageError::SqliteError {
            message: "disk full".to_string(),
        })
    }

    fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
        Ok(None)
    }
}

struct RecordingNotifier {
    name: &'static str,
    sent: AtomicUsize,
}

impl RecordingNotifier {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            sent: AtomicUsize::new(0),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn channel(&self) -> &str {
        self.name
    }

    fn deliver(
        &self,
        _message: &RenderedMessage,
        address: &str,
    ) -> Result<DeliveryStatus, ReportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(DeliveryStatus {
            channel: self.name.to_string(),
            delivered: true,
            detail: Some(address.to_string()),
        })
    }
}

struct DeadChannel;

impl Notifier for DeadChannel {
    fn channel(&self) -> &str {
        "sms"
    }

    fn deliver(
        &self,
        _message: &RenderedMessage,
        _address: &str,
    ) -> Result<DeliveryStatus, ReportError> {
        Err(ReportError::DeliveryFailed {
            channel: "sms".to_string(),
            message: "gateway unreachable".to_string(),
        })
    }
}

struct CountingTracker {
    created: AtomicUsize,
}

impl IssueTracker for CountingTracker {
    fn create_issue(&self, payload: &IssuePayload) -> Result<String, ReportError> {
        assert!(!payload.title.is_empty());
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("ISSUE-{}", n + 1))
    }
}

struct StubSummarizer;

impl Summarizer for StubSummarizer {
    fn summarize(&self, _prompt: &NarrativePrompt) -> Result<String, ReportError> {
        Ok("service narrative".to_string())
    }
}

#[test]
fn full_run_stores_notifies_and_files_an_issue() {
    let store = Arc::new(MemoryStore::new());
    let chat = Arc::new(RecordingNotifier::new("chat"));
    let tracker = Arc::new(CountingTracker {
        created: AtomicUsize::new(0),
    });

    let config = ReportConfig {
        file_issues: Some(true),
        ..Default::default()
    };
    let runner = IncidentRunner::new(config, clock())
        .with_store(store.clone())
        .with_summarizer(Arc::new(StubSummarizer))
        .with_notifier(
            chat.clone(),
            NotificationTarget {
                address: "#incidents".to_string(),
            },
        )
        .with_tracker(tracker);

    let outcome = runner.process(analyzed_incident());
    assert!(outcome.is_clean());

    let report = outcome.data;
    assert_eq!(report.incident_id, "incident-20231026-130000");
    assert!(report.stored);
    assert_eq!(store.len(), 1);
    assert!(store.get(&report.incident_id).unwrap().is_some());

    assert_eq!(report.narrative, "service narrative");
    assert_eq!(report.deliveries.len(), 1);
    assert!(report.deliveries[0].delivered);
    assert_eq!(chat.sent.load(Ordering::SeqCst), 1);

    assert_eq!(report.issue_id.as_deref(), Some("ISSUE-1"));
}

#[test]
fn failing_collaborators_degrade_without_losing_the_analysis() {
    let runner = IncidentRunner::new(ReportConfig::default(), clock())
        .with_store(Arc::new(FailingStore))
        .with_notifier(
            Arc::new(DeadChannel),
            NotificationTarget {
                address: "+15550100".to_string(),
            },
        );

    let outcome = runner.process(analyzed_incident());

    assert_eq!(outcome.error_count(), 2);
    assert_eq!(outcome.errors[0].error_code(), "VIGIL_STORAGE_ERROR");
    assert_eq!(outcome.errors[1].error_code(), "VIGIL_REPORT_ERROR");

    let report = outcome.data;
    assert!(!report.stored);
    assert_eq!(report.deliveries.len(), 1);
    assert!(!report.deliveries[0].delivered);

    // The analysis itself is intact.
    assert_eq!(report.result.stats.total_errors, 6);
    // With no summarizer configured, the fallback narrative applies.
    assert!(report.narrative.contains("INCIDENT ANALYSIS REPORT"));
}

#[test]
fn issues_are_not_filed_when_disabled() {
    let tracker = Arc::new(CountingTracker {
        created: AtomicUsize::new(0),
    });

    let runner = IncidentRunner::new(ReportConfig::default(), clock())
        .with_tracker(tracker.clone());
    let outcome = runner.process(analyzed_incident());
    assert!(outcome.data.issue_id.is_none());
    assert_eq!(tracker.created.load(Ordering::SeqCst), 0);
}

#[test]
fn issues_are_not_filed_below_the_severity_threshold() {
    let tracker = Arc::new(CountingTracker {
        created: AtomicUsize::new(0),
    });
    let config = ReportConfig {
        file_issues: Some(true),
        ..Default::default()
    };

    // A single error: severity medium, below the filing threshold.
    let pipeline = AnalysisPipeline::with_clock(AnalysisConfig::default(), clock());
    let mut map = Map::new();
    map.insert("logLevel".to_string(), Value::from("ERROR"));
    map.insert("message".to_string(), Value::from("lone failure"));
    map.insert(
        "timestamp".to_string(),
        Value::from("2023-10-26T12:10:00Z"),
    );
    let result = pipeline
        .run(&AnalysisBatch::new(vec![RawRecord::Map(map)], None))
        .unwrap();

    let runner = IncidentRunner::new(config, clock()).with_tracker(tracker.clone());
    let outcome = runner.process(result);
    assert!(outcome.data.issue_id.is_none());
    assert_eq!(tracker.created.load(Ordering::SeqCst), 0);
}

#[test]
fn runner_without_collaborators_still_reports() {
    let outcome = IncidentRunner::new(ReportConfig::default(), clock())
        .process(analyzed_incident());

    assert!(outcome.is_clean());
    let report = outcome.data;
    assert!(!report.stored);
    assert!(report.deliveries.is_empty());
    assert!(report.issue_id.is_none());
    assert!(!report.narrative.is_empty());
}
