//! Report store errors. Callers at the orchestration boundary absorb these;
//! a failing store never aborts an analysis run.

use super::error_code::{self, VigilErrorCode};

/// Errors that can occur in the incident report store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Document serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Migration failed: {message}")]
    MigrationFailed { message: String },
}

impl VigilErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
