//! Structured narrative prompt built from an `AnalysisResult`.

use std::fmt::Write as _;

use vigil_core::types::AnalysisResult;

/// The structured prompt handed to the narrative service.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativePrompt {
    pub text: String,
}

/// Build the incident-analysis prompt.
///
/// Deterministic for a given result: every section is derived from result
/// fields, so reruns produce the same prompt.
pub fn build(result: &AnalysisResult, max_exemplars: usize) -> NarrativePrompt {
    let mut text = String::new();

    let _ = writeln!(text, "INCIDENT ANALYSIS REQUEST:");
    let _ = writeln!(text);

    let _ = writeln!(text, "TIMELINE:");
    if let Some(deploy) = &result.stats.deploy {
        let _ = writeln!(
            text,
            "- Deployment: {} ({})",
            deploy.sha,
            deploy.message.as_deref().unwrap_or("no message")
        );
    } else {
        let _ = writeln!(text, "- Deployment: none supplied");
    }
    let _ = writeln!(
        text,
        "- Error spike: {} errors at {}",
        result.correlation.peak_error_count,
        result
            .preview
            .first_error_bucket
            .as_deref()
            .unwrap_or("unknown")
    );
    match result.correlation.minutes_after_deploy {
        Some(m) => {
            let _ = writeln!(text, "- Time correlation: {m} minutes after deployment");
        }
        None => {
            let _ = writeln!(text, "- Time correlation: unknown");
        }
    }
    let _ = writeln!(
        text,
        "- Correlation level: {} (deploy impact: {})",
        result.correlation.correlation, result.correlation.deploy_impact
    );
    let _ = writeln!(text);

    let _ = writeln!(text, "ERROR STATISTICS:");
    let _ = writeln!(text, "- Total errors: {}", result.stats.total_errors);
    let _ = writeln!(
        text,
        "- Timeline: {} time periods tracked",
        result.stats.total_error_points
    );
    let _ = writeln!(
        text,
        "- Affected components: {} files",
        result.stats.affected_files
    );
    let _ = writeln!(text, "- Severity: {}", result.severity);
    let _ = writeln!(text);

    let _ = writeln!(text, "SAMPLE ERRORS:");
    for cluster in result.clusters.iter().take(max_exemplars) {
        let _ = writeln!(
            text,
            "- [{}x] {}",
            cluster.member_count, cluster.signature
        );
    }
    if result.clusters.is_empty() {
        let _ = writeln!(text, "- none");
    }
    let _ = writeln!(text);

    let _ = writeln!(
        text,
        "Write a concise incident report: executive summary, deployment \
         correlation, root-cause hypothesis, and immediate actions. Be \
         specific about timestamps and identifiers."
    );

    NarrativePrompt { text }
}
