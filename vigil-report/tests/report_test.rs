//! Tests for prompt building, narrative fallback, rendering, and issue
//! payloads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use vigil_analysis::AnalysisPipeline;
use vigil_core::config::AnalysisConfig;
use vigil_core::errors::ReportError;
use vigil_core::traits::FixedClock;
use vigil_core::types::{AnalysisBatch, AnalysisResult, DeployEvent, RawRecord};
use vigil_report::narrative::{build_narrative, fallback_narrative};
use vigil_report::{issue, prompt, render, Summarizer};

fn analyzed_incident() -> AnalysisResult {
    let clock = FixedClock("2023-10-26T13:00:00Z".parse::<DateTime<Utc>>().unwrap());
    let pipeline = AnalysisPipeline::with_clock(AnalysisConfig::default(), Arc::new(clock));

    let mut records = Vec::new();
    for i in 0..6 {
        let mut map = Map::new();
        map.insert("logLevel".to_string(), Value::from("ERROR"));
        map.insert(
            "message".to_string(),
            Value::from(format!("Task timed out after {i} seconds in worker.py:12")),
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
        message: Some("tighten timeouts".to_string()),
        changed_files: vec!["worker.py".to_string()],
    };

    pipeline
        .run(&AnalysisBatch::new(records, Some(deploy)))
        .unwrap()
}

struct EchoSummarizer;

impl Summarizer for EchoSummarizer {
    fn summarize(&self, prompt: &prompt::NarrativePrompt) -> Result<String, ReportError> {
        Ok(format!("SERVICE:{}", prompt.text.len()))
    }
}

struct DownSummarizer;

impl Summarizer for DownSummarizer {
    fn summarize(&self, _prompt: &prompt::NarrativePrompt) -> Result<String, ReportError> {
        Err(ReportError::SummarizerUnavailable {
            message: "connection refused".to_string(),
        })
    }
}

#[test]
fn prompt_carries_deploy_and_statistics() {
    let result = analyzed_incident();
    let p = prompt::build(&result, 5);

    assert!(p.text.contains("abc123"));
    assert!(p.text.contains("10 minutes after deployment"));
    assert!(p.text.contains("Total errors: 6"));
    assert!(p.text.contains("SAMPLE ERRORS:"));
}

#[test]
fn prompt_is_deterministic() {
    let result = analyzed_incident();
    assert_eq!(prompt::build(&result, 5), prompt::build(&result, 5));
}

#[test]
fn narrative_uses_the_service_when_available() {
    let result = analyzed_incident();
    let p = prompt::build(&result, 5);
    let narrative = build_narrative(Some(&EchoSummarizer), &p, &result);
    assert!(narrative.starts_with("SERVICE:"));
}

#[test]
fn narrative_falls_back_when_the_service_fails() {
    let result = analyzed_incident();
    let p = prompt::build(&result, 5);
    let narrative = build_narrative(Some(&DownSummarizer), &p, &result);
    assert_eq!(narrative, fallback_narrative(&result));
    assert!(narrative.contains("INCIDENT ANALYSIS REPORT"));
    assert!(narrative.contains("abc123"));
}

#[test]
fn narrative_falls_back_when_no_service_is_configured() {
    let result = analyzed_incident();
    let p = prompt::build(&result, 5);
    let narrative = build_narrative(None, &p, &result);
    assert_eq!(narrative, fallback_narrative(&result));
}

#[test]
fn rendered_message_headlines_severity_and_count() {
    let result = analyzed_incident();
    let message = render::render("incident-20231026-130000", &result);

    assert!(message.headline.contains("HIGH"));
    assert!(message.headline.contains("6 errors"));
    assert!(message.body.contains("abc123"));
    assert!(message.body.contains("Next: [CRITICAL]"));
}

#[test]
fn issue_payload_maps_severity_to_priority() {
    let result = analyzed_incident();
    let narrative = fallback_narrative(&result);
    let payload = issue::build_payload(
        "incident-20231026-130000",
        &result,
        &narrative,
        vec!["bug".to_string(), "incident".to_string()],
    );

    assert!(payload.title.contains("6 errors"));
    assert_eq!(payload.priority, "high");
    assert_eq!(payload.labels, vec!["bug", "incident"]);
    assert_eq!(payload.body, narrative);
}
