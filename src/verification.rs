/*!
 * Verification of produced translation artifacts.
 *
 * The checks are structural and diff-based, not semantic: they approximate
 * "this file was actually translated" well enough to gate the retry loop.
 * False positives and negatives on near-identical languages are expected
 * and acceptable. Each check gates the next:
 *
 * 1. the artifact exists and is not trivially short;
 * 2. it starts with the header delimiter and parses into header + body;
 * 3. the body is not trivially short;
 * 4. against the original: either a compared header field or one of the
 *    first three markdown headings must have changed.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::Document;
use crate::file_utils::FileManager;

/// Header fields compared against the original during verification
const COMPARED_FIELDS: [&str; 3] = ["title", "description", "summary"];

/// How many leading markdown headings are compared
const HEADING_LIMIT: usize = 3;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+\S.*$").expect("heading regex is valid"));

/// Configuration for artifact verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Minimum trimmed length of the whole artifact, in characters
    #[serde(default = "default_min_total_chars")]
    pub min_total_chars: usize,

    /// Minimum trimmed length of the body after the header, in characters
    #[serde(default = "default_min_body_chars")]
    pub min_body_chars: usize,
}

fn default_min_total_chars() -> usize {
    100
}

fn default_min_body_chars() -> usize {
    50
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            min_total_chars: default_min_total_chars(),
            min_body_chars: default_min_body_chars(),
        }
    }
}

/// Outcome of verifying one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Artifact passed verification
    Accepted,
    /// Artifact passed, but only through the lenient no-headings path
    AcceptedWithWarning,
    /// Artifact failed verification
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Why an artifact was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// File missing or unreadable
    Unreadable,
    /// Whole artifact shorter than the minimum
    TooShort,
    /// No parseable front-matter header
    MalformedHeader,
    /// Body after the header shorter than the minimum
    BodyTooShort,
    /// Neither header fields nor headings changed against the original
    NotTranslated,
}

/// Structural verifier for produced translation artifacts
pub struct VerificationEngine {
    config: VerificationConfig,
}

impl VerificationEngine {
    /// Create a new verification engine with default configuration
    pub fn new() -> Self {
        Self::with_config(VerificationConfig::default())
    }

    /// Create a new verification engine with custom configuration
    pub fn with_config(config: VerificationConfig) -> Self {
        Self { config }
    }

    /// Verify a produced artifact, optionally against the original
    /// document. Re-running on unchanged inputs yields the same verdict.
    pub fn verify(&self, produced_path: &Path, original: Option<&Document>) -> Verdict {
        let Ok(content) = FileManager::read_to_string(produced_path) else {
            return Verdict::Rejected(RejectReason::Unreadable);
        };

        if content.trim().chars().count() < self.config.min_total_chars {
            debug!("Artifact below minimum length: {:?}", produced_path);
            return Verdict::Rejected(RejectReason::TooShort);
        }

        let produced = Document::parse(&content);
        if !produced.has_front_matter() {
            debug!("Artifact has no parseable header: {:?}", produced_path);
            return Verdict::Rejected(RejectReason::MalformedHeader);
        }

        if produced.body.trim().chars().count() < self.config.min_body_chars {
            debug!("Artifact body below minimum length: {:?}", produced_path);
            return Verdict::Rejected(RejectReason::BodyTooShort);
        }

        let Some(original) = original else {
            return Verdict::Accepted;
        };

        let header_translated = Self::header_translated(original, &produced);

        let original_headings = extract_headings(&original.body);
        let produced_headings = extract_headings(&produced.body);
        let headings_translated = original_headings
            .iter()
            .zip(produced_headings.iter())
            .any(|(a, b)| !a.eq_ignore_ascii_case(b));

        if header_translated || headings_translated {
            return Verdict::Accepted;
        }

        if !original_headings.is_empty() {
            return Verdict::Rejected(RejectReason::NotTranslated);
        }

        // No headings to compare and an unchanged header: accept, but flag
        // the quality gap. Some posts carry minimal header content.
        warn!(
            "Accepting artifact with no verifiable translation signal: {:?}",
            produced_path
        );
        Verdict::AcceptedWithWarning
    }

    /// Whether any compared header field differs meaningfully from the
    /// original. Pure-URL values are ignored.
    fn header_translated(original: &Document, produced: &Document) -> bool {
        COMPARED_FIELDS.iter().any(|field| {
            let Some(original_value) = original.str_field(field) else {
                return false;
            };
            let Some(produced_value) = produced.str_field(field) else {
                return false;
            };
            if is_pure_url(original_value) {
                return false;
            }
            !original_value.trim().eq_ignore_ascii_case(produced_value.trim())
        })
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract up to the first three markdown heading lines from a body
pub fn extract_headings(body: &str) -> Vec<String> {
    HEADING_RE
        .find_iter(body)
        .take(HEADING_LIMIT)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// A value that is only a URL or URL path carries no translatable text
fn is_pure_url(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.contains(char::is_whitespace)
        && (trimmed.starts_with("http://")
            || trimmed.starts_with("https://")
            || trimmed.starts_with('/'))
}
