//! Input validation, basic statistics, and the quick-glance preview.
//!
//! Validation never aborts a run; findings become issues on the report.

use vigil_core::types::{
    BasicStats, DeployEvent, DeploySummary, FileHits, Preview, SignatureCluster,
    TimeSeriesPoint, ValidationReport,
};

/// Validate the assembled analysis inputs.
pub fn validate(
    series: &[TimeSeriesPoint],
    clusters: &[SignatureCluster],
    file_hits: &FileHits,
    deploy: Option<&DeployEvent>,
) -> ValidationReport {
    let mut issues = Vec::new();

    for window in series.windows(2) {
        if window[0].bucket >= window[1].bucket {
            issues.push(format!(
                "Series buckets out of order: {:?} before {:?}",
                window[0].bucket, window[1].bucket
            ));
            break;
        }
    }
    if let Some(point) = series.iter().find(|p| p.count == 0) {
        issues.push(format!("Series bucket {:?} has a zero count", point.bucket));
    }

    if let Some(deploy) = deploy {
        if deploy.sha.trim().is_empty() {
            issues.push("Deploy event is missing its sha".to_string());
        }
    }

    let summary = format!(
        "Validated {} time points, {} exemplars, {} files",
        series.len(),
        clusters.len(),
        file_hits.len()
    );

    ValidationReport {
        valid: issues.is_empty(),
        issues,
        summary,
    }
}

/// Headline counts for the result.
pub fn basic_stats(
    series: &[TimeSeriesPoint],
    total_errors: u64,
    unique_signatures: usize,
    file_hits: &FileHits,
    deploy: Option<&DeployEvent>,
) -> BasicStats {
    BasicStats {
        total_error_points: series.len(),
        total_errors,
        unique_signatures,
        affected_files: file_hits.len(),
        deploy: deploy.map(|d| DeploySummary {
            sha: d.sha.clone(),
            message: d.message.clone(),
            files_changed: d.changed_files.len(),
        }),
    }
}

/// Quick-glance preview of the most salient findings.
pub fn preview(
    series: &[TimeSeriesPoint],
    clusters: &[SignatureCluster],
    file_hits: &FileHits,
    excerpt_chars: usize,
) -> Preview {
    let most_hit_file = file_hits
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(file, count)| (file.clone(), *count));

    Preview {
        first_error_bucket: series.first().map(|p| p.bucket.clone()),
        peak_errors: series.iter().map(|p| p.count).max().unwrap_or(0),
        top_exemplar_excerpt: clusters
            .first()
            .map(|c| excerpt(&c.exemplar.message, excerpt_chars)),
        most_hit_file,
    }
}

/// Truncate on a char boundary, marking elision.
fn excerpt(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &message[..byte_idx]),
        None => message.to_string(),
    }
}
