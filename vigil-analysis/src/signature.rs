//! Signature Clusterer — deduplicates error records into representative
//! signatures.
//!
//! A signature is the message with volatile literals (timestamps, request
//! ids, UUIDs, numbers) replaced by placeholder tokens and truncated to a
//! fixed length. Records sharing a signature are the same error class
//! regardless of literal values.

use std::sync::OnceLock;

use regex::Regex;

use vigil_core::types::collections::FxHashMap;
use vigil_core::types::{LogRecord, SignatureCluster};

/// Maximum signature length in characters.
pub const SIGNATURE_MAX_CHARS: usize = 200;

fn timestamp_re() -> &'static Regex {
    static TIMESTAMP_RE: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP_RE.get_or_init(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?")
            .expect("valid timestamp regex")
    })
}

fn request_id_re() -> &'static Regex {
    static REQUEST_ID_RE: OnceLock<Regex> = OnceLock::new();
    REQUEST_ID_RE
        .get_or_init(|| Regex::new(r"\[RequestId: [^\]]+\]").expect("valid request id regex"))
}

fn uuid_re() -> &'static Regex {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    UUID_RE.get_or_init(|| {
        Regex::new(
            r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        )
        .expect("valid uuid regex")
    })
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| Regex::new(r"\b\d+\b").expect("valid number regex"))
}

/// Compute the signature of one message.
///
/// Substitution order matters: timestamps before bare numbers, so a
/// timestamp collapses to one `[TIMESTAMP]` token instead of six
/// `[NUMBER]` fragments.
pub fn signature_of(message: &str) -> String {
    let sig = timestamp_re().replace_all(message, "[TIMESTAMP]");
    let sig = request_id_re().replace_all(&sig, "[REQUEST_ID]");
    let sig = uuid_re().replace_all(&sig, "[UUID]");
    let sig = number_re().replace_all(&sig, "[NUMBER]");
    truncate_chars(&sig, SIGNATURE_MAX_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Outcome of clustering one batch's error records.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    /// At most `max_exemplars` clusters, in first-seen order.
    pub clusters: Vec<SignatureCluster>,
    /// Distinct signatures observed, including those beyond the cap.
    pub unique_signatures: usize,
}

/// Groups error records by signature, first-seen order, capped exemplars.
pub struct SignatureClusterer {
    max_exemplars: usize,
}

impl SignatureClusterer {
    pub fn new(max_exemplars: usize) -> Self {
        Self { max_exemplars }
    }

    /// Cluster the given error-classified records.
    ///
    /// The exemplar for each cluster is the first record seen with that
    /// signature. Truncation keeps the first `max_exemplars` groups in
    /// first-seen order — deliberately not a popularity sort, so low caps
    /// surface result diversity rather than the single most frequent
    /// pattern.
    pub fn cluster(&self, error_records: &[&LogRecord]) -> ClusterOutcome {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut groups: Vec<SignatureCluster> = Vec::new();

        for record in error_records {
            let signature = signature_of(&record.message);
            match index.get(&signature) {
                Some(&i) => groups[i].member_count += 1,
                None => {
                    index.insert(signature.clone(), groups.len());
                    groups.push(SignatureCluster {
                        signature,
                        exemplar: (*record).clone(),
                        member_count: 1,
                    });
                }
            }
        }

        let unique_signatures = groups.len();
        groups.truncate(self.max_exemplars);

        ClusterOutcome {
            clusters: groups,
            unique_signatures,
        }
    }
}
