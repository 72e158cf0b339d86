//! Layered configuration for the engine and its glue layers.

pub mod analysis_config;
pub mod report_config;
pub mod storage_config;
pub mod vigil_config;

pub use analysis_config::AnalysisConfig;
pub use report_config::ReportConfig;
pub use storage_config::StorageConfig;
pub use vigil_config::{Overrides, VigilConfig};
