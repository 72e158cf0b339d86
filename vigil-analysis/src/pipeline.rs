//! Pipeline Orchestrator — sequences the engine over one batch.
//!
//! Data flows strictly left-to-right: raw records → normalized records →
//! {series, clusters, file hits} → correlation → classification →
//! recommendations → `AnalysisResult`. The pipeline holds no cross-run
//! state; independent batches may run concurrently.

use std::sync::Arc;

use rayon::prelude::*;

use vigil_core::config::AnalysisConfig;
use vigil_core::errors::PipelineError;
use vigil_core::events::{
    AnalysisCompleteEvent, AnalysisStartedEvent, BatchNormalizedEvent, ClusterDiscoveredEvent,
    CorrelationComputedEvent, EventDispatcher, VigilEventHandler,
};
use vigil_core::traits::{Clock, SystemClock};
use vigil_core::types::{AnalysisBatch, AnalysisResult, LogRecord, Severity, TimestampSource};

use crate::normalize::LogNormalizer;
use crate::{classify, correlate, series, signature, stack, validate};

/// The analysis pipeline. Cheap to construct; safe to share across threads.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    clock: Arc<dyn Clock>,
    events: EventDispatcher,
}

impl AnalysisPipeline {
    /// Create a pipeline with the wall clock.
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a pipeline with an injected clock (pinned in tests so
    /// fallback timestamps and `generated_at` are deterministic).
    pub fn with_clock(config: AnalysisConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            events: EventDispatcher::new(),
        }
    }

    /// Register a lifecycle event handler.
    pub fn register_handler(&mut self, handler: Arc<dyn VigilEventHandler>) {
        self.events.register(handler);
    }

    /// Run the engine over one batch.
    ///
    /// Always produces a complete result, including for the empty batch;
    /// bad input degrades inside the stages rather than failing the run.
    pub fn run(&self, batch: &AnalysisBatch) -> Result<AnalysisResult, PipelineError> {
        self.events.emit_analysis_started(&AnalysisStartedEvent {
            record_count: batch.records.len(),
            has_deploy: batch.deploy.is_some(),
        });

        // Normalize.
        let normalizer = LogNormalizer::new(self.clock.clone());
        let records: Vec<LogRecord> =
            batch.records.iter().map(|raw| normalizer.normalize(raw)).collect();
        let error_records: Vec<&LogRecord> =
            records.iter().filter(|r| r.is_error()).collect();
        let fallback_timestamps = records
            .iter()
            .filter(|r| r.timestamp_source == TimestampSource::Ingestion)
            .count();

        self.events.emit_batch_normalized(&BatchNormalizedEvent {
            total: records.len(),
            errors: error_records.len(),
            fallback_timestamps,
        });
        tracing::debug!(
            total = records.len(),
            errors = error_records.len(),
            fallback_timestamps,
            "batch normalized"
        );

        // Derive series, clusters, and file hits.
        let series = series::build(&error_records);
        let outcome = signature::SignatureClusterer::new(
            self.config.effective_max_exemplars(),
        )
        .cluster(&error_records);
        for cluster in &outcome.clusters {
            self.events.emit_cluster_discovered(&ClusterDiscoveredEvent {
                signature: cluster.signature.clone(),
                member_count: cluster.member_count,
            });
        }
        let file_hits = stack::count_file_hits(&records);

        // Correlate with the deployment.
        let correlation = correlate::correlate(&series, batch.deploy.as_ref());
        self.events.emit_correlation_computed(&CorrelationComputedEvent {
            correlation: correlation.correlation.name().to_string(),
            minutes_after_deploy: correlation.minutes_after_deploy,
            deploy_impact: correlation.deploy_impact,
        });

        // Classify and recommend.
        let total_errors = error_records.len() as u64;
        let severity = Severity::from_error_count(total_errors);
        let categories = classify::categorize(&error_records);
        let recommendations = classify::recommend(
            total_errors,
            &correlation,
            batch.deploy.as_ref(),
            &categories,
        );

        // Assemble.
        let validation =
            validate::validate(&series, &outcome.clusters, &file_hits, batch.deploy.as_ref());
        let stats = validate::basic_stats(
            &series,
            total_errors,
            outcome.unique_signatures,
            &file_hits,
            batch.deploy.as_ref(),
        );
        let preview = validate::preview(
            &series,
            &outcome.clusters,
            &file_hits,
            self.config.effective_preview_excerpt_chars(),
        );

        let result = AnalysisResult {
            validation,
            stats,
            preview,
            series,
            clusters: outcome.clusters,
            file_hits,
            correlation,
            severity,
            recommendations,
            generated_at: self.clock.now(),
        };

        self.events.emit_analysis_complete(&AnalysisCompleteEvent {
            severity: result.severity.name().to_string(),
            total_errors,
            recommendation_count: result.recommendations.len(),
        });
        tracing::info!(
            severity = %result.severity,
            total_errors,
            recommendations = result.recommendations.len(),
            "analysis complete"
        );

        Ok(result)
    }

    /// Run independent batches concurrently. Each run is fully isolated;
    /// runs share only the constant pattern tables.
    pub fn run_many(
        &self,
        batches: &[AnalysisBatch],
    ) -> Vec<Result<AnalysisResult, PipelineError>> {
        batches.par_iter().map(|batch| self.run(batch)).collect()
    }
}
