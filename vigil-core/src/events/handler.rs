//! Event handler trait with no-op defaults.

use super::types::*;

/// Observer for analysis lifecycle events.
///
/// Every method has a no-op default, so handlers implement only the events
/// they care about. Handlers must be `Send + Sync`; the dispatcher may be
/// shared across concurrent batch runs.
pub trait VigilEventHandler: Send + Sync {
    fn on_analysis_started(&self, _event: &AnalysisStartedEvent) {}
    fn on_batch_normalized(&self, _event: &BatchNormalizedEvent) {}
    fn on_cluster_discovered(&self, _event: &ClusterDiscoveredEvent) {}
    fn on_correlation_computed(&self, _event: &CorrelationComputedEvent) {}
    fn on_analysis_complete(&self, _event: &AnalysisCompleteEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
