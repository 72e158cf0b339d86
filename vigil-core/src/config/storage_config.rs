//! Report store settings.

use serde::{Deserialize, Serialize};

/// Configuration for the incident report store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file. In-memory when unset.
    pub db_path: Option<String>,
    /// Rows returned by the recent-incidents listing.
    pub recent_limit: Option<usize>,
}

impl StorageConfig {
    pub fn effective_recent_limit(&self) -> usize {
        self.recent_limit.unwrap_or(20)
    }
}
