//! Queries for the incident_reports table.

use rusqlite::{params, Connection, OptionalExtension};
use vigil_core::errors::StorageError;

use crate::connection::sqlite_error;

/// One stored report row, body still serialized.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub key: String,
    pub severity: String,
    pub total_errors: i64,
    pub body: String,
    pub created_at: i64,
}

/// Insert a report document. Keys are unique per incident run.
pub fn insert_report(
    conn: &Connection,
    key: &str,
    severity: &str,
    total_errors: i64,
    body: &str,
    created_at: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO incident_reports (key, severity, total_errors, body, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![key, severity, total_errors, body, created_at],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

/// Fetch one report by key.
pub fn get_report(conn: &Connection, key: &str) -> Result<Option<ReportRow>, StorageError> {
    conn.prepare_cached(
        "SELECT key, severity, total_errors, body, created_at
         FROM incident_reports WHERE key = ?1",
    )
    .map_err(sqlite_error)?
    .query_row(params![key], row_to_report)
    .optional()
    .map_err(sqlite_error)
}

/// Fetch the most recently stored report.
pub fn latest_report(conn: &Connection) -> Result<Option<ReportRow>, StorageError> {
    conn.prepare_cached(
        "SELECT key, severity, total_errors, body, created_at
         FROM incident_reports ORDER BY created_at DESC, key DESC LIMIT 1",
    )
    .map_err(sqlite_error)?
    .query_row([], row_to_report)
    .optional()
    .map_err(sqlite_error)
}

/// List recent reports, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<ReportRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT key, severity, total_errors, body, created_at
             FROM incident_reports ORDER BY created_at DESC, key DESC LIMIT ?1",
        )
        .map_err(sqlite_error)?;

    let rows = stmt
        .query_map(params![limit as i64], row_to_report)
        .map_err(sqlite_error)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

/// Count stored reports.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM incident_reports", [], |row| row.get(0))
        .map_err(sqlite_error)
}

fn row_to_report(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        key: row.get(0)?,
        severity: row.get(1)?,
        total_errors: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}
