//! # vigil-report
//!
//! Everything between an `AnalysisResult` and the humans who act on it:
//! narrative prompt building with a deterministic fallback, short channel
//! message rendering, issue-tracker payloads, and the incident runner that
//! sequences store → narrative → notify → issue while absorbing collaborator
//! failures.

pub mod issue;
pub mod narrative;
pub mod notify;
pub mod prompt;
pub mod render;
pub mod runner;

pub use issue::{IssuePayload, IssueTracker};
pub use narrative::Summarizer;
pub use notify::{DeliveryStatus, Notifier};
pub use render::RenderedMessage;
pub use runner::{IncidentReport, IncidentRunner, NotificationTarget};
