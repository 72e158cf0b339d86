//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, VigilErrorCode};
use super::{ConfigError, ReportError, StorageError};

/// Errors that can occur at the orchestration boundary.
/// Aggregates subsystem errors via `From` conversions.
///
/// Bad input never produces one of these: malformed records degrade inside
/// the normalizer and missing deploy context degrades inside the correlator.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VigilErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Internal(_) => error_code::INTERNAL_ERROR,
        }
    }
}

/// Result of an orchestrated run that accumulates non-fatal errors.
/// Allows the analysis output to be returned even when downstream
/// collaborators fail.
#[derive(Debug)]
pub struct PipelineResult<T> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T> PipelineResult<T> {
    /// Create a new result with no collected errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
