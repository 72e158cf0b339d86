//! Notification channel seam.

use vigil_core::errors::ReportError;

use crate::render::RenderedMessage;

/// Delivery outcome for one channel send.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryStatus {
    pub channel: String,
    pub delivered: bool,
    pub detail: Option<String>,
}

/// A notification channel: rendered message plus channel-specific
/// addressing in, delivery status out.
pub trait Notifier: Send + Sync {
    /// Channel name used in delivery statuses and degradation reports.
    fn channel(&self) -> &str;

    fn deliver(&self, message: &RenderedMessage, address: &str)
        -> Result<DeliveryStatus, ReportError>;
}
