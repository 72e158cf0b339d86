//! Stack Extractor — source-file references from message and stack text.
//!
//! Several alternative patterns are applied independently and unioned;
//! duplicate matches within one record collapse before counting, so a file
//! mentioned three times in one trace contributes one hit for that record.

use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;

use vigil_core::types::collections::FxHashSet;
use vigil_core::types::{FileHits, LogRecord};

/// Extensions recognized as source files.
const EXT_ALTERNATION: &str = "py|js|ts|java|rb|php|go|rs|cpp|c|h";

fn quoted_re() -> &'static Regex {
    static QUOTED_RE: OnceLock<Regex> = OnceLock::new();
    QUOTED_RE.get_or_init(|| {
        Regex::new(&format!(r#"File\s+"([^"]+\.(?:{EXT_ALTERNATION}))""#))
            .expect("valid quoted file regex")
    })
}

fn bracketed_re() -> &'static Regex {
    static BRACKETED_RE: OnceLock<Regex> = OnceLock::new();
    BRACKETED_RE.get_or_init(|| {
        Regex::new(&format!(r"\[([^\[\]\s]+\.(?:{EXT_ALTERNATION}))\]"))
            .expect("valid bracketed file regex")
    })
}

fn path_line_re() -> &'static Regex {
    static PATH_LINE_RE: OnceLock<Regex> = OnceLock::new();
    PATH_LINE_RE.get_or_init(|| {
        Regex::new(&format!(r"([/\w.-]+\.(?:{EXT_ALTERNATION})):\d+"))
            .expect("valid path:line regex")
    })
}

fn frame_re() -> &'static Regex {
    static FRAME_RE: OnceLock<Regex> = OnceLock::new();
    FRAME_RE.get_or_init(|| {
        Regex::new(&format!(
            r"\bat\s+[\w$.<>]+\s*\(([^()\s:]+\.(?:{EXT_ALTERNATION})):\d+"
        ))
        .expect("valid frame regex")
    })
}

fn bare_path_re() -> &'static Regex {
    static BARE_PATH_RE: OnceLock<Regex> = OnceLock::new();
    BARE_PATH_RE.get_or_init(|| {
        Regex::new(&format!(r"\b([\w/.-]+\.(?:{EXT_ALTERNATION}))\b"))
            .expect("valid bare path regex")
    })
}

/// Extract the deduplicated set of file references in one record.
///
/// Scans the message concatenated with any stack text. Returns an empty set
/// when nothing matches; never fails.
pub fn extract_files(record: &LogRecord) -> SmallVec<[String; 4]> {
    let text = match &record.stack_text {
        Some(stack) => format!("{}\n{}", record.message, stack),
        None => record.message.clone(),
    };

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut files: SmallVec<[String; 4]> = SmallVec::new();

    for re in [
        quoted_re(),
        bracketed_re(),
        path_line_re(),
        frame_re(),
        bare_path_re(),
    ] {
        for caps in re.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                if seen.insert(m.as_str()) {
                    files.push(m.as_str().to_string());
                }
            }
        }
    }

    files
}

/// Count file hits across all records: one increment per record that
/// mentions the file, regardless of how many times it appears in that
/// record's text.
pub fn count_file_hits(records: &[LogRecord]) -> FileHits {
    let mut hits = FileHits::new();
    for record in records {
        for file in extract_files(record) {
            *hits.entry(file).or_insert(0) += 1;
        }
    }
    hits
}
