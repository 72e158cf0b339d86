//! Event payload types for the analysis lifecycle.

/// Payload for `on_analysis_started`.
#[derive(Debug, Clone)]
pub struct AnalysisStartedEvent {
    pub record_count: usize,
    pub has_deploy: bool,
}

/// Payload for `on_batch_normalized`.
#[derive(Debug, Clone)]
pub struct BatchNormalizedEvent {
    pub total: usize,
    pub errors: usize,
    pub fallback_timestamps: usize,
}

/// Payload for `on_cluster_discovered`.
#[derive(Debug, Clone)]
pub struct ClusterDiscoveredEvent {
    pub signature: String,
    pub member_count: u64,
}

/// Payload for `on_correlation_computed`.
#[derive(Debug, Clone)]
pub struct CorrelationComputedEvent {
    pub correlation: String,
    pub minutes_after_deploy: Option<i64>,
    pub deploy_impact: bool,
}

/// Payload for `on_analysis_complete`.
#[derive(Debug, Clone)]
pub struct AnalysisCompleteEvent {
    pub severity: String,
    pub total_errors: u64,
    pub recommendation_count: usize,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
