//! Top-level Vigil configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ReportConfig, StorageConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`VIGIL_*`)
/// 3. Project config (`vigil.toml` in the project root)
/// 4. User config (`~/.vigil/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
    pub report: ReportConfig,
}

/// Caller overrides that take precedence over every file and env layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_exemplars: Option<usize>,
    pub db_path: Option<String>,
    pub file_issues: Option<bool>,
}

impl VigilConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&Overrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("vigil.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(ov) = overrides {
            Self::apply_overrides(&mut config, ov);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &VigilConfig) -> Result<(), ConfigError> {
        if let Some(max) = config.analysis.max_exemplars {
            if max == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.max_exemplars".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(chars) = config.analysis.preview_excerpt_chars {
            if chars == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.preview_excerpt_chars".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(limit) = config.storage.recent_limit {
            if limit == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.recent_limit".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VigilConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: VigilConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut VigilConfig, other: &VigilConfig) {
        // Analysis
        if other.analysis.max_exemplars.is_some() {
            base.analysis.max_exemplars = other.analysis.max_exemplars;
        }
        if other.analysis.preview_excerpt_chars.is_some() {
            base.analysis.preview_excerpt_chars = other.analysis.preview_excerpt_chars;
        }

        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.recent_limit.is_some() {
            base.storage.recent_limit = other.storage.recent_limit;
        }

        // Report
        if other.report.max_narrative_exemplars.is_some() {
            base.report.max_narrative_exemplars = other.report.max_narrative_exemplars;
        }
        if other.report.file_issues.is_some() {
            base.report.file_issues = other.report.file_issues;
        }
        if !other.report.issue_labels.is_empty() {
            base.report.issue_labels = other.report.issue_labels.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `VIGIL_ANALYSIS_MAX_EXEMPLARS`, `VIGIL_STORAGE_DB_PATH`, etc.
    fn apply_env_overrides(config: &mut VigilConfig) {
        if let Ok(val) = std::env::var("VIGIL_ANALYSIS_MAX_EXEMPLARS") {
            if let Ok(v) = val.parse::<usize>() {
                config.analysis.max_exemplars = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_STORAGE_DB_PATH") {
            config.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("VIGIL_STORAGE_RECENT_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                config.storage.recent_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_REPORT_FILE_ISSUES") {
            if let Ok(v) = val.parse::<bool>() {
                config.report.file_issues = Some(v);
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut VigilConfig, ov: &Overrides) {
        if let Some(v) = ov.max_exemplars {
            config.analysis.max_exemplars = Some(v);
        }
        if let Some(ref v) = ov.db_path {
            config.storage.db_path = Some(v.clone());
        }
        if let Some(v) = ov.file_issues {
            config.report.file_issues = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user config path: `~/.vigil/config.toml`.
fn user_config_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".vigil").join("config.toml"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
