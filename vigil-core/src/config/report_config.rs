//! Report generation and delivery settings.

use serde::{Deserialize, Serialize};

/// Configuration for narrative generation, notifications, and issue filing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Exemplars quoted in the narrative prompt.
    pub max_narrative_exemplars: Option<usize>,
    /// File a tracker issue for qualifying incidents.
    pub file_issues: Option<bool>,
    /// Labels attached to filed issues.
    pub issue_labels: Vec<String>,
}

impl ReportConfig {
    pub fn effective_max_narrative_exemplars(&self) -> usize {
        self.max_narrative_exemplars.unwrap_or(5)
    }

    pub fn effective_file_issues(&self) -> bool {
        self.file_issues.unwrap_or(false)
    }

    pub fn effective_issue_labels(&self) -> Vec<String> {
        if self.issue_labels.is_empty() {
            vec!["bug".to_string(), "incident".to_string()]
        } else {
            self.issue_labels.clone()
        }
    }
}
