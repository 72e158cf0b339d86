//! Narrative generation with a required deterministic fallback.

use std::fmt::Write as _;

use vigil_core::errors::ReportError;
use vigil_core::types::AnalysisResult;

use crate::prompt::NarrativePrompt;

/// The narrative-generation collaborator: structured prompt in, prose out.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, prompt: &NarrativePrompt) -> Result<String, ReportError>;
}

/// Generate the incident narrative, falling back to the template when the
/// service is unavailable. The fallback path is an explicit, tested branch,
/// not a side effect of error suppression.
pub fn build_narrative(
    summarizer: Option<&dyn Summarizer>,
    prompt: &NarrativePrompt,
    result: &AnalysisResult,
) -> String {
    if let Some(service) = summarizer {
        match service.summarize(prompt) {
            Ok(narrative) => return narrative,
            Err(e) => {
                tracing::warn!(error = %e, "narrative service failed; using fallback template");
            }
        }
    }
    fallback_narrative(result)
}

/// Deterministic narrative template used when the service is missing or
/// failing.
pub fn fallback_narrative(result: &AnalysisResult) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "INCIDENT ANALYSIS REPORT");
    let _ = writeln!(text);

    let _ = writeln!(
        text,
        "Summary: {} errors across {} components; severity {}.",
        result.stats.total_errors, result.stats.affected_files, result.severity
    );

    match (&result.stats.deploy, result.correlation.minutes_after_deploy) {
        (Some(deploy), Some(minutes)) => {
            let _ = writeln!(
                text,
                "Deployment {} correlates with the error spike ({} errors, {} minutes \
                 post-deployment, correlation {}).",
                deploy.sha,
                result.correlation.peak_error_count,
                minutes,
                result.correlation.correlation
            );
        }
        (Some(deploy), None) => {
            let _ = writeln!(
                text,
                "Deployment {} could not be correlated with the error timeline \
                 (correlation {}).",
                deploy.sha, result.correlation.correlation
            );
        }
        (None, _) => {
            let _ = writeln!(text, "No deployment context was supplied.");
        }
    }

    if let Some((file, hits)) = &result.preview.most_hit_file {
        let _ = writeln!(
            text,
            "Most implicated file: {file} ({hits} records)."
        );
    }

    if !result.recommendations.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(text, "Recommended actions:");
        for rec in &result.recommendations {
            let _ = writeln!(
                text,
                "- [{}] {} ({})",
                rec.priority, rec.action, rec.reason
            );
        }
    }

    text
}
