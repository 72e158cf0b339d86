//! Core data model for the incident correlation engine.

pub mod analysis;
pub mod collections;
pub mod deploy;
pub mod record;

pub use analysis::{
    AnalysisBatch, AnalysisResult, BasicStats, Confidence, CorrelationLevel,
    CorrelationResult, DeploySummary, FileHits, Preview, Priority, Recommendation, Severity,
    SignatureCluster, TimeSeriesPoint, ValidationReport,
};
pub use deploy::DeployEvent;
pub use record::{LogLevel, LogRecord, RawRecord, TimestampSource};
