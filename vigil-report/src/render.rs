//! Short message rendering for notification channels.

use std::fmt::Write as _;

use vigil_core::types::AnalysisResult;

/// A channel-agnostic rendered message.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    /// One-line headline suitable for SMS or a chat title.
    pub headline: String,
    /// Multi-line body for channels that support it.
    pub body: String,
}

/// Render the short incident notification.
pub fn render(incident_id: &str, result: &AnalysisResult) -> RenderedMessage {
    let headline = format!(
        "[{}] {} — {} errors",
        result.severity.name().to_uppercase(),
        incident_id,
        result.stats.total_errors
    );

    let mut body = String::new();
    let _ = writeln!(body, "{headline}");

    if let Some(deploy) = &result.stats.deploy {
        match result.correlation.minutes_after_deploy {
            Some(minutes) => {
                let _ = writeln!(
                    body,
                    "Deploy {}: spike {} minutes after ({})",
                    deploy.sha, minutes, result.correlation.correlation
                );
            }
            None => {
                let _ = writeln!(
                    body,
                    "Deploy {}: correlation {}",
                    deploy.sha, result.correlation.correlation
                );
            }
        }
    }

    if let Some((file, hits)) = &result.preview.most_hit_file {
        let _ = writeln!(body, "Top file: {file} ({hits} hits)");
    }

    if let Some(top) = result.recommendations.first() {
        let _ = writeln!(body, "Next: [{}] {}", top.priority, top.action);
    }

    RenderedMessage { headline, body }
}
