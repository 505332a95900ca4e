/*!
 * Report schemas and writers.
 *
 * The coverage report is the contract between the scanner and every
 * downstream consumer (the translate command, ticket reporting, CI). Its
 * JSON shape is stable; fields are never renamed. The translation task
 * report maps post paths to the languages produced in one run, with one
 * canonical schema and an explicit adapter for the legacy bare-list shape.
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::file_utils::FileManager;

/// A filter that was active during a scan, echoed into the report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedFilter {
    /// Stable filter name
    pub name: String,
    /// Filter-specific configuration
    pub config: serde_json::Value,
}

/// Per-post coverage record; only posts with at least one gap appear
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageEntry {
    /// Post path relative to the repository root
    pub path: String,
    /// Canonical-language URL, when the header provides one
    pub url: Option<String>,
    /// Full URLs per language, for every variant whose header provides one
    pub urls: BTreeMap<String, String>,
    /// Target languages with no variant on disk, in expected-language order
    pub missing_languages: Vec<String>,
    /// Number of missing languages
    pub missing_count: usize,
    /// Number of expected target languages
    pub total_expected: usize,
}

/// Aggregate counters for one scan run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageSummary {
    /// Post directories found minus filtered-out posts
    pub total_posts_scanned: usize,
    /// Posts with at least one missing language
    pub posts_with_missing_translations: usize,
    /// Posts with every expected variant present
    pub posts_complete: usize,
    /// Filters that were active during the scan
    pub filters_applied: Vec<AppliedFilter>,
    /// Posts excluded, per filter name
    pub filters_counts: BTreeMap<String, usize>,
    /// Expected target languages in stable order
    pub expected_languages: Vec<String>,
    /// Number of expected target languages
    pub total_expected_languages: usize,
    /// True when no post has a coverage gap
    pub all_complete: bool,
    /// Site base URL used for URL derivation
    pub base_url: String,
    /// ISO-8601 generation timestamp (UTC)
    pub date_generated: String,
}

/// Complete coverage report: summary plus per-post entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    pub summary: CoverageSummary,
    pub posts: Vec<CoverageEntry>,
}

impl CoverageReport {
    /// Load a previously written report, e.g. as translate-command input
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse coverage report: {:?}", path.as_ref()))
    }

    /// Serialize the report to pretty-printed JSON and write it out.
    ///
    /// Write failures surface to the caller; there is no retry here.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize coverage report")?;
        FileManager::write_to_file(&path, &json)?;
        log::info!("JSON report saved to: {:?}", path.as_ref());
        Ok(())
    }

    /// Render the human-readable console report
    pub fn render_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let rule = "=".repeat(80);
        let thin_rule = "-".repeat(80);

        lines.push(rule.clone());
        lines.push("BLOG POST TRANSLATION SCANNER REPORT".to_string());
        lines.push(rule.clone());
        lines.push(String::new());

        lines.push("SUMMARY".to_string());
        lines.push(thin_rule.clone());
        lines.push(format!("Date generated: {}", self.summary.date_generated));
        lines.push(format!("Total blog posts scanned: {}", self.summary.total_posts_scanned));

        if !self.summary.filters_applied.is_empty() {
            lines.push("Applied filters:".to_string());
            for filter in &self.summary.filters_applied {
                let config = filter
                    .config
                    .as_object()
                    .map(|obj| {
                        obj.iter()
                            .map(|(k, v)| format!("{}={}", k, v))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                if config.is_empty() {
                    lines.push(format!("  - {}", filter.name));
                } else {
                    lines.push(format!("  - {} ({})", filter.name, config));
                }
            }
            lines.push(String::new());
        }

        if !self.summary.filters_counts.is_empty() {
            lines.push("Posts filtered by filter:".to_string());
            for (name, count) in &self.summary.filters_counts {
                lines.push(format!("  {}: {}", name, count));
            }
            lines.push(String::new());
        }

        lines.push(format!(
            "Posts with missing translations: {}",
            self.summary.posts_with_missing_translations
        ));
        lines.push(format!("Posts with complete translations: {}", self.summary.posts_complete));
        lines.push(format!("Expected languages: {}", self.summary.total_expected_languages));
        lines.push(String::new());

        if self.posts.is_empty() {
            lines.push("All blog posts have complete translations!".to_string());
            lines.push(String::new());
        } else {
            lines.push("DETAILED REPORT".to_string());
            lines.push(thin_rule);
            for post in &self.posts {
                lines.push(String::new());
                lines.push(format!("Post: {}", post.path));
                lines.push(format!("  Missing translations: {}", post.missing_languages.join(", ")));
                lines.push(format!(
                    "  Missing count: {}/{}",
                    post.missing_count, post.total_expected
                ));
            }
        }

        lines.push(String::new());
        lines.push(rule);
        lines.join("\n")
    }
}

/// Languages produced for one post in a translation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslatedPost {
    /// Language codes successfully translated and verified
    pub languages: Vec<String>,
    /// Canonical URL of the post, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Translation task report: post path to produced languages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TranslationReport {
    pub posts: BTreeMap<String, TranslatedPost>,
}

impl TranslationReport {
    /// Record one produced (post, language) pair
    pub fn record(&mut self, path: &str, language: &str, url: Option<&str>) {
        let entry = self.posts.entry(path.to_string()).or_insert_with(|| TranslatedPost {
            languages: Vec::new(),
            url: url.map(String::from),
        });
        if entry.url.is_none() {
            entry.url = url.map(String::from);
        }
        entry.languages.push(language.to_string());
    }

    /// Adapter for the legacy report shape: a bare list of language codes
    /// per path, with no URL information.
    pub fn from_legacy(legacy: BTreeMap<String, Vec<String>>) -> Self {
        let posts = legacy
            .into_iter()
            .map(|(path, languages)| (path, TranslatedPost { languages, url: None }))
            .collect();
        Self { posts }
    }

    /// Load a report file, accepting the canonical shape and migrating the
    /// legacy one through [`TranslationReport::from_legacy`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        if let Ok(report) = serde_json::from_str::<TranslationReport>(&content) {
            return Ok(report);
        }
        let legacy: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse translation report: {:?}", path.as_ref()))?;
        Ok(Self::from_legacy(legacy))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize translation report")?;
        FileManager::write_to_file(&path, &json)?;
        log::info!("Translation report saved to: {:?}", path.as_ref());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
