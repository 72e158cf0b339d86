//! Incident runner — the orchestration boundary around one analysis result.
//!
//! Sequences store → narrative → notifications → issue. Every collaborator
//! failure is absorbed as a non-fatal error on the returned
//! `PipelineResult`; the analysis output is produced regardless of
//! collaborator health.

use std::sync::Arc;

use vigil_core::config::ReportConfig;
use vigil_core::errors::{PipelineResult, StorageError};
use vigil_core::traits::Clock;
use vigil_core::types::{AnalysisResult, Severity};
use vigil_storage::DocumentStore;

use crate::narrative::{build_narrative, Summarizer};
use crate::notify::{DeliveryStatus, Notifier};
use crate::prompt;
use crate::render;
use crate::issue::{self, IssueTracker};

/// One notification target: a channel and its address.
#[derive(Debug, Clone)]
pub struct NotificationTarget {
    pub address: String,
}

/// Everything produced at the orchestration boundary for one incident.
/// Collaborator failures absorbed along the way travel beside it in the
/// surrounding [`PipelineResult`].
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub incident_id: String,
    pub result: AnalysisResult,
    pub narrative: String,
    pub stored: bool,
    pub deliveries: Vec<DeliveryStatus>,
    /// Identifier of the created tracker issue, when one was filed.
    pub issue_id: Option<String>,
}

/// Sequences downstream collaborators for each analysis result.
///
/// Collaborators are optional: absent ones are skipped, failing ones are
/// logged and recorded, and neither affects the returned analysis.
pub struct IncidentRunner {
    config: ReportConfig,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn DocumentStore>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    notifiers: Vec<(Arc<dyn Notifier>, NotificationTarget)>,
    tracker: Option<Arc<dyn IssueTracker>>,
}

impl IncidentRunner {
    pub fn new(config: ReportConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            store: None,
            summarizer: None,
            notifiers: Vec::new(),
            tracker: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_notifier(
        mut self,
        notifier: Arc<dyn Notifier>,
        target: NotificationTarget,
    ) -> Self {
        self.notifiers.push((notifier, target));
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Process one analysis result through every configured collaborator.
    ///
    /// Collaborator failures accumulate as non-fatal errors on the returned
    /// `PipelineResult`; the report itself is always produced.
    pub fn process(&self, result: AnalysisResult) -> PipelineResult<IncidentReport> {
        let incident_id = format!(
            "incident-{}",
            self.clock.now().format("%Y%m%d-%H%M%S")
        );
        let mut errors = Vec::new();

        // Durable store.
        let mut stored = false;
        if let Some(store) = &self.store {
            match serde_json::to_value(&result) {
                Ok(document) => match store.put(&incident_id, &document) {
                    Ok(()) => stored = true,
                    Err(e) => {
                        tracing::warn!(error = %e, incident_id = %incident_id, "report store unavailable");
                        errors.push(e.into());
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, incident_id = %incident_id, "report serialization failed");
                    errors.push(
                        StorageError::SerializationFailed {
                            message: e.to_string(),
                        }
                        .into(),
                    );
                }
            }
        }

        // Narrative, with the deterministic fallback inside build_narrative.
        let narrative_prompt =
            prompt::build(&result, self.config.effective_max_narrative_exemplars());
        let narrative =
            build_narrative(self.summarizer.as_deref(), &narrative_prompt, &result);

        // Notification channels.
        let message = render::render(&incident_id, &result);
        let mut deliveries = Vec::new();
        for (notifier, target) in &self.notifiers {
            match notifier.deliver(&message, &target.address) {
                Ok(status) => deliveries.push(status),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        channel = notifier.channel(),
                        "notification channel unavailable"
                    );
                    deliveries.push(DeliveryStatus {
                        channel: notifier.channel().to_string(),
                        delivered: false,
                        detail: Some(e.to_string()),
                    });
                    errors.push(e.into());
                }
            }
        }

        // Tracker issue for qualifying incidents.
        let mut issue_id = None;
        if self.config.effective_file_issues() && result.severity >= Severity::High {
            if let Some(tracker) = &self.tracker {
                let payload = issue::build_payload(
                    &incident_id,
                    &result,
                    &narrative,
                    self.config.effective_issue_labels(),
                );
                match tracker.create_issue(&payload) {
                    Ok(id) => issue_id = Some(id),
                    Err(e) => {
                        tracing::warn!(error = %e, "issue tracker unavailable");
                        errors.push(e.into());
                    }
                }
            }
        }

        let mut outcome = PipelineResult::new(IncidentReport {
            incident_id,
            result,
            narrative,
            stored,
            deliveries,
            issue_id,
        });
        for error in errors {
            outcome.add_error(error);
        }
        outcome
    }
}
