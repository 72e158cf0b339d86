//! Issue-tracker payloads and client seam.

use serde::{Deserialize, Serialize};

use vigil_core::errors::ReportError;
use vigil_core::types::{AnalysisResult, Severity};

/// Payload for a tracker issue created from an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    /// Tracker-side priority tag derived from severity.
    pub priority: String,
}

/// The issue-tracker collaborator. Returns the created issue identifier.
pub trait IssueTracker: Send + Sync {
    fn create_issue(&self, payload: &IssuePayload) -> Result<String, ReportError>;
}

/// Build the issue payload for one incident.
pub fn build_payload(
    incident_id: &str,
    result: &AnalysisResult,
    narrative: &str,
    labels: Vec<String>,
) -> IssuePayload {
    let priority = match result.severity {
        Severity::Critical | Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    };

    IssuePayload {
        title: format!(
            "{} incident {}: {} errors detected",
            result.severity, incident_id, result.stats.total_errors
        ),
        body: narrative.to_string(),
        labels,
        priority: priority.to_string(),
    }
}
