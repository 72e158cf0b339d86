//! Embedded schema for the report database.

use rusqlite::Connection;
use vigil_core::errors::StorageError;

/// Initial schema: the incident report document table.
pub const MIGRATION_SQL: &str = r#"
-- Incident reports: one JSON document per pipeline run.
-- The runner writes each report once; rows are never updated.
CREATE TABLE IF NOT EXISTS incident_reports (
    key TEXT PRIMARY KEY,
    severity TEXT NOT NULL,
    total_errors INTEGER NOT NULL,
    body TEXT NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_incident_reports_created
    ON incident_reports(created_at DESC);
"#;

/// Run all migrations against the given connection.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(MIGRATION_SQL)
        .map_err(|e| StorageError::MigrationFailed {
            message: e.to_string(),
        })
}
