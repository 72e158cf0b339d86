//! Deployment event supplied by the caller. Read-only to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deployment event to correlate against the error series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployEvent {
    /// Commit or release identifier. Required.
    pub sha: String,
    /// Deployment completion time. Correlation degrades to `Unknown` when
    /// absent.
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-text deployment message.
    pub message: Option<String>,
    /// Paths changed by the deployment, in the order reported.
    pub changed_files: Vec<String>,
}

impl DeployEvent {
    /// Convenience constructor with only the required identifier.
    pub fn new(sha: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            timestamp: None,
            message: None,
            changed_files: Vec::new(),
        }
    }
}
