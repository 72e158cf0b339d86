//! Derived analysis types: series, clusters, correlation, severity,
//! recommendations, and the terminal `AnalysisResult` aggregate.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deploy::DeployEvent;
use super::record::{LogRecord, RawRecord};

/// One batch of input for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBatch {
    /// Raw records in arrival order.
    pub records: Vec<RawRecord>,
    /// Deployment event to correlate against, if known.
    pub deploy: Option<DeployEvent>,
}

impl AnalysisBatch {
    pub fn new(records: Vec<RawRecord>, deploy: Option<DeployEvent>) -> Self {
        Self { records, deploy }
    }

    /// An empty batch. Valid input: yields a low-severity empty result.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            deploy: None,
        }
    }
}

/// One populated minute of the error time series.
///
/// `bucket` is `YYYY-MM-DD HH:MM` in UTC; lexicographic order equals
/// chronological order for this fixed format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub bucket: String,
    pub count: u64,
}

/// One deduplicated error class with its representative record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureCluster {
    /// Placeholder-substituted message, truncated to the signature limit.
    pub signature: String,
    /// First record observed for this signature.
    pub exemplar: LogRecord,
    /// Total records grouped under this signature.
    pub member_count: u64,
}

/// File path → number of records implicating that file via stack text.
///
/// Ordered map so serialized results are byte-stable across runs.
pub type FileHits = BTreeMap<String, u64>;

/// Qualitative confidence that the deployment caused the error spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationLevel {
    /// Peak within 30 minutes after the deploy.
    High,
    /// Peak between 30 and 60 minutes after the deploy.
    Medium,
    /// Peak more than an hour after, or before, the deploy.
    Low,
    /// No series or no deploy timestamp to correlate against.
    Unknown,
}

impl CorrelationLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CorrelationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of correlating the error series with a deployment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub correlation: CorrelationLevel,
    /// Whole minutes from deploy to the series peak. Negative when the peak
    /// preceded the deploy. `None` when correlation is `Unknown`.
    pub minutes_after_deploy: Option<i64>,
    /// Count at the series peak; 0 for an empty series.
    pub peak_error_count: u64,
    /// True iff correlation is `High` (or the conservative unparseable-peak
    /// fallback fired).
    pub deploy_impact: bool,
}

impl CorrelationResult {
    /// The degraded result for a missing series or deploy timestamp.
    pub fn unknown(peak_error_count: u64) -> Self {
        Self {
            correlation: CorrelationLevel::Unknown,
            minutes_after_deploy: None,
            peak_error_count,
            deploy_impact: false,
        }
    }
}

/// Coarse incident magnitude derived solely from total error count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Classify a total error count.
    pub fn from_error_count(total_errors: u64) -> Self {
        if total_errors >= 10 {
            Self::Critical
        } else if total_errors >= 5 {
            Self::High
        } else if total_errors >= 1 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recommendation priority, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Sort rank: lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Confidence attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One actionable recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub reason: String,
    pub confidence: Confidence,
}

/// Validation findings for one batch. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub summary: String,
}

/// Deploy echo carried in the basic statistics block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploySummary {
    pub sha: String,
    pub message: Option<String>,
    pub files_changed: usize,
}

/// Headline counts for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    /// Populated minutes in the error series.
    pub total_error_points: usize,
    /// Error-classified records in the batch.
    pub total_errors: u64,
    /// Distinct signatures observed, including those beyond the exemplar cap.
    pub unique_signatures: usize,
    /// Files implicated by stack text.
    pub affected_files: usize,
    pub deploy: Option<DeploySummary>,
}

/// Quick-glance preview of the most salient findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    /// Earliest populated series bucket.
    pub first_error_bucket: Option<String>,
    /// Count at the series peak.
    pub peak_errors: u64,
    /// First exemplar message, truncated for display.
    pub top_exemplar_excerpt: Option<String>,
    /// Most-implicated file and its hit count.
    pub most_hit_file: Option<(String, u64)>,
}

/// Terminal aggregate of one pipeline run. Owned by that run; never shared
/// or mutated post-construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub validation: ValidationReport,
    pub stats: BasicStats,
    pub preview: Preview,
    pub series: Vec<TimeSeriesPoint>,
    pub clusters: Vec<SignatureCluster>,
    pub file_hits: FileHits,
    pub correlation: CorrelationResult,
    pub severity: Severity,
    pub recommendations: Vec<Recommendation>,
    /// Injected-clock time at assembly; pinned in tests for reproducibility.
    pub generated_at: DateTime<Utc>,
}
