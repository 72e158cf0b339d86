//! # vigil-core
//!
//! Core types, traits, errors, configuration, events, and tracing setup for
//! the Vigil incident correlation engine.

pub mod config;
pub mod errors;
pub mod events;
pub mod telemetry;
pub mod traits;
pub mod types;
