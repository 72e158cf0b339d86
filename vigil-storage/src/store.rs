//! The `DocumentStore` seam and its implementations.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use vigil_core::errors::StorageError;
use vigil_core::traits::Clock;
use vigil_core::types::collections::FxHashMap;

use crate::connection::DatabaseManager;
use crate::reports;

/// Durable store contract consumed by the incident runner: put a JSON
/// document under a key, get it back, or not-found.
pub trait DocumentStore: Send + Sync {
    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError>;
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
}

/// SQLite-backed report store.
pub struct SqliteReportStore {
    db: DatabaseManager,
    clock: Arc<dyn Clock>,
}

impl SqliteReportStore {
    pub fn new(db: DatabaseManager, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// The most recently stored document, if any. Stands in for the
    /// `latest` pointer polled by dashboards.
    pub fn latest(&self) -> Result<Option<Value>, StorageError> {
        self.db.with_conn(|conn| {
            match reports::latest_report(conn)? {
                Some(row) => parse_body(&row.body).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Keys of recent reports, newest first.
    pub fn recent_keys(&self, limit: usize) -> Result<Vec<String>, StorageError> {
        self.db.with_conn(|conn| {
            Ok(reports::query_recent(conn, limit)?
                .into_iter()
                .map(|row| row.key)
                .collect())
        })
    }

    /// Total stored reports.
    pub fn count(&self) -> Result<i64, StorageError> {
        self.db.with_conn(reports::count)
    }
}

impl DocumentStore for SqliteReportStore {
    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let body = serde_json::to_string(document).map_err(|e| {
            StorageError::SerializationFailed {
                message: e.to_string(),
            }
        })?;

        // Columns promoted out of the body for indexed listing.
        let severity = document
            .get("severity")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let total_errors = document
            .pointer("/stats/total_errors")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let created_at = self.clock.now().timestamp();
        self.db.with_conn(|conn| {
            reports::insert_report(conn, key, &severity, total_errors, &body, created_at)
        })?;
        tracing::debug!(key, severity = %severity, total_errors, "report stored");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.db.with_conn(|conn| match reports::get_report(conn, key)? {
            Some(row) => parse_body(&row.body).map(Some),
            None => Ok(None),
        })
    }
}

fn parse_body(body: &str) -> Result<Value, StorageError> {
    serde_json::from_str(body).map_err(|e| StorageError::SerializationFailed {
        message: e.to_string(),
    })
}

/// In-memory store for tests and for callers that do not persist.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<FxHashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let mut documents = self.documents.lock().map_err(|_| {
            StorageError::SqliteError {
                message: "memory store lock poisoned".to_string(),
            }
        })?;
        documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let documents = self.documents.lock().map_err(|_| {
            StorageError::SqliteError {
                message: "memory store lock poisoned".to_string(),
            }
        })?;
        Ok(documents.get(key).cloned())
    }
}
