//! Engine tunables.

use serde::{Deserialize, Serialize};

/// Configuration for the analysis pipeline.
///
/// All fields are optional so layered merging can distinguish "unset" from
/// an explicit value; `effective_*` accessors apply compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum signature clusters surfaced per run (first-seen order).
    pub max_exemplars: Option<usize>,
    /// Characters of an exemplar message shown in the result preview.
    pub preview_excerpt_chars: Option<usize>,
}

impl AnalysisConfig {
    pub fn effective_max_exemplars(&self) -> usize {
        self.max_exemplars.unwrap_or(10)
    }

    pub fn effective_preview_excerpt_chars(&self) -> usize {
        self.preview_excerpt_chars.unwrap_or(100)
    }
}
