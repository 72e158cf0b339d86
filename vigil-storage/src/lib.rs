//! # vigil-storage
//!
//! Durable storage for incident reports. The engine itself never touches
//! storage; the incident runner persists each `AnalysisResult` here as a
//! JSON document keyed by incident id, with a `latest` pointer for
//! dashboards that poll.

pub mod connection;
pub mod migrations;
pub mod reports;
pub mod store;

pub use connection::DatabaseManager;
pub use store::{DocumentStore, MemoryStore, SqliteReportStore};
