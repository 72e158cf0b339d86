//! Classifier & Recommender — severity and prioritized recommendations.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;

use vigil_core::types::{
    Confidence, CorrelationResult, DeployEvent, LogRecord, Priority, Recommendation,
};

/// Errors above this count trigger the escalation recommendation.
const ESCALATION_THRESHOLD: u64 = 5;
/// Changed files reviewed per deploy.
const CHANGED_FILE_REVIEW_CAP: usize = 2;

/// Known error-type categories with category-specific recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Timeout,
    ConnectionDatabase,
    AccessDenied,
    Throttling,
}

impl ErrorCategory {
    const ALL: [ErrorCategory; 4] = [
        Self::Timeout,
        Self::ConnectionDatabase,
        Self::AccessDenied,
        Self::Throttling,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Timeout => &["timeout", "timed out"],
            Self::ConnectionDatabase => &["connection", "database"],
            Self::AccessDenied => &["access denied", "accessdenied", "not authorized", "permission denied", "unauthorized"],
            Self::Throttling => &["throttl", "rate exceeded"],
        }
    }

    fn priority(&self) -> Priority {
        match self {
            Self::Timeout | Self::ConnectionDatabase => Priority::High,
            Self::AccessDenied | Self::Throttling => Priority::Medium,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Timeout => "Review timeout configuration and downstream latency",
            Self::ConnectionDatabase => "Check database connectivity and connection pool health",
            Self::AccessDenied => "Audit credentials and access policies for the failing principals",
            Self::Throttling => "Raise rate limits or add backoff to throttled callers",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionDatabase => "connection/database",
            Self::AccessDenied => "access-denied",
            Self::Throttling => "throttling",
        }
    }
}

/// Flattened keyword table: (pattern index ranges per category).
fn category_matcher() -> &'static (AhoCorasick, Vec<ErrorCategory>) {
    static MATCHER: OnceLock<(AhoCorasick, Vec<ErrorCategory>)> = OnceLock::new();
    MATCHER.get_or_init(|| {
        let mut patterns: Vec<&'static str> = Vec::new();
        let mut owners: Vec<ErrorCategory> = Vec::new();
        for category in ErrorCategory::ALL {
            for kw in category.keywords() {
                patterns.push(kw);
                owners.push(category);
            }
        }
        let ac = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .expect("valid category patterns");
        (ac, owners)
    })
}

/// Count error records matching each category. A record matching several
/// keywords of one category counts once for it.
pub fn categorize(error_records: &[&LogRecord]) -> Vec<(ErrorCategory, u64)> {
    let (ac, owners) = category_matcher();
    let mut counts = [0u64; 4];

    for record in error_records {
        let haystack = match &record.error_type {
            Some(et) => format!("{} {}", et, record.message),
            None => record.message.clone(),
        };

        let mut matched = [false; 4];
        for m in ac.find_iter(&haystack) {
            let category = owners[m.pattern().as_usize()];
            let slot = ErrorCategory::ALL.iter().position(|c| *c == category).unwrap();
            matched[slot] = true;
        }
        for (slot, hit) in matched.iter().enumerate() {
            if *hit {
                counts[slot] += 1;
            }
        }
    }

    ErrorCategory::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| (*category, count))
        .collect()
}

/// Synthesize recommendations for one run.
///
/// Emission order follows the rule order below; the final list is
/// stable-sorted by priority, so priorities descend overall while emission
/// order is preserved within each priority. Empty only for zero-error runs.
pub fn recommend(
    total_errors: u64,
    correlation: &CorrelationResult,
    deploy: Option<&DeployEvent>,
    categories: &[(ErrorCategory, u64)],
) -> Vec<Recommendation> {
    if total_errors == 0 {
        return Vec::new();
    }

    let mut recommendations = Vec::new();

    // Rule 1: deploy impact → roll back.
    if correlation.deploy_impact {
        let sha = deploy.map(|d| d.sha.as_str()).unwrap_or("unknown");
        let timing = match correlation.minutes_after_deploy {
            Some(m) => format!("Error spike occurred {m} minutes after deployment"),
            None => "Error spike timing is consistent with the deployment".to_string(),
        };
        recommendations.push(Recommendation {
            priority: Priority::Critical,
            action: format!("Immediate rollback to the commit prior to {sha}"),
            reason: timing,
            confidence: Confidence::High,
        });
    }

    // Rule 2: error volume → escalate.
    if total_errors > ESCALATION_THRESHOLD {
        recommendations.push(Recommendation {
            priority: Priority::High,
            action: "Activate incident response".to_string(),
            reason: format!("{total_errors} errors affecting multiple components"),
            confidence: Confidence::High,
        });
    }

    // Rule 3: review recently changed files.
    if let Some(deploy) = deploy {
        for file in deploy.changed_files.iter().take(CHANGED_FILE_REVIEW_CAP) {
            recommendations.push(Recommendation {
                priority: Priority::Medium,
                action: format!("Review changes in {file}"),
                reason: format!(
                    "File was modified in deployment {} and may be causing errors",
                    deploy.sha
                ),
                confidence: Confidence::Medium,
            });
        }
    }

    // Rule 4: category-specific actions.
    for (category, affected) in categories {
        recommendations.push(Recommendation {
            priority: category.priority(),
            action: category.action().to_string(),
            reason: format!(
                "{affected} error record(s) match the {} category",
                category.label()
            ),
            confidence: Confidence::Medium,
        });
    }

    // No rule fired but errors exist: keep the list non-empty.
    if recommendations.is_empty() {
        recommendations.push(Recommendation {
            priority: Priority::Low,
            action: "Monitor the affected components".to_string(),
            reason: format!("{total_errors} error(s) without a stronger signal"),
            confidence: Confidence::Low,
        });
    }

    recommendations.sort_by_key(|r| r.priority.rank());
    recommendations
}
