//! Report-generation and delivery errors.

use super::error_code::{self, VigilErrorCode};

/// Errors from downstream report collaborators: the narrative service,
/// notification channels, and the issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Narrative service unavailable: {message}")]
    SummarizerUnavailable { message: String },

    #[error("Delivery to {channel} failed: {message}")]
    DeliveryFailed { channel: String, message: String },

    #[error("Issue creation failed: {message}")]
    IssueCreationFailed { message: String },
}

impl VigilErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
