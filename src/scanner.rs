/*!
 * Coverage scanner: walks the content tree and computes, per post, the set
 * of target languages with no translated variant on disk.
 *
 * Posts are directories containing the canonical `index.md`. A post whose
 * front matter cannot be parsed is still scanned (filters fail open); a
 * post matched by an exclusion filter is left out of every total and
 * counted under that filter's name.
 */

use chrono::Utc;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::{DEFAULT_LANGUAGE, SiteConfig};
use crate::document::Document;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::filters::FilterChain;
use crate::report::{AppliedFilter, CoverageEntry, CoverageReport, CoverageSummary};

/// Scans a content tree for missing translations
pub struct CoverageScanner {
    expected_languages: Vec<String>,
    base_url: String,
    chain: FilterChain,
}

impl CoverageScanner {
    pub fn new(site: &SiteConfig, chain: FilterChain) -> Self {
        Self {
            expected_languages: site.expected_languages(),
            base_url: site.base_url.clone(),
            chain,
        }
    }

    /// The target languages this scanner checks for
    pub fn expected_languages(&self) -> &[String] {
        &self.expected_languages
    }

    /// Scan the content tree and build a coverage report.
    ///
    /// `total_posts_scanned` is the number of post directories found minus
    /// the posts excluded by filters; only posts with at least one missing
    /// language produce an entry.
    pub fn scan(&self, content_root: &Path) -> Result<CoverageReport, AppError> {
        if !FileManager::dir_exists(content_root) {
            return Err(AppError::File(format!(
                "Content directory not found: {:?}",
                content_root
            )));
        }

        let post_dirs = Self::find_post_directories(content_root);
        info!("Found {} blog post directories", post_dirs.len());

        // Report paths are relative to the parent of the content root, so
        // they keep the content directory name as their first segment.
        let path_base = content_root.parent().unwrap_or(content_root);

        let mut entries: Vec<CoverageEntry> = Vec::new();
        let mut filter_counts: BTreeMap<String, usize> = BTreeMap::new();

        for post_dir in &post_dirs {
            let rel_path = post_dir
                .strip_prefix(path_base)
                .unwrap_or(post_dir)
                .to_string_lossy()
                .to_string();

            let canonical = Document::parse(
                &FileManager::read_to_string(FileManager::canonical_path(post_dir))
                    .unwrap_or_default(),
            );

            if let Some(filter_name) = self.chain.evaluate(canonical.front_matter.as_ref()) {
                *filter_counts.entry(filter_name.to_string()).or_insert(0) += 1;
                debug!("Skipping post (filter: {}): {}", filter_name, rel_path);
                continue;
            }

            let found = Self::found_languages(post_dir);
            let missing: Vec<String> = self
                .expected_languages
                .iter()
                .filter(|lang| !found.contains(*lang))
                .cloned()
                .collect();

            if missing.is_empty() {
                continue;
            }

            let mut urls: BTreeMap<String, String> = BTreeMap::new();
            let url_en = self.variant_url(post_dir, None);
            if let Some(url) = &url_en {
                urls.insert(DEFAULT_LANGUAGE.to_string(), url.clone());
            }
            for lang in &self.expected_languages {
                if let Some(url) = self.variant_url(post_dir, Some(lang)) {
                    urls.insert(lang.clone(), url);
                }
            }

            entries.push(CoverageEntry {
                path: rel_path,
                url: url_en,
                urls,
                missing_count: missing.len(),
                total_expected: self.expected_languages.len(),
                missing_languages: missing,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));

        for (name, count) in &filter_counts {
            debug!("Skipped {} posts (filter: {})", count, name);
        }

        let filtered_out: usize = filter_counts.values().sum();
        let total_scanned = post_dirs.len() - filtered_out;

        let filters_applied = self
            .chain
            .enabled_filters()
            .map(|f| AppliedFilter {
                name: f.kind.name().to_string(),
                config: f.kind.config_value(),
            })
            .collect();

        Ok(CoverageReport {
            summary: CoverageSummary {
                total_posts_scanned: total_scanned,
                posts_with_missing_translations: entries.len(),
                posts_complete: total_scanned - entries.len(),
                filters_applied,
                filters_counts: filter_counts,
                expected_languages: self.expected_languages.clone(),
                total_expected_languages: self.expected_languages.len(),
                all_complete: entries.is_empty(),
                base_url: self.base_url.clone(),
                date_generated: Utc::now().to_rfc3339(),
            },
            posts: entries,
        })
    }

    /// Every directory under the content root containing a canonical
    /// document, in sorted order.
    fn find_post_directories(content_root: &Path) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = WalkDir::new(content_root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .filter(|dir| FileManager::file_exists(FileManager::canonical_path(dir)))
            .collect();
        dirs.sort();
        dirs
    }

    /// Language codes for which a translated variant file exists
    fn found_languages(post_dir: &Path) -> BTreeSet<String> {
        let Ok(read_dir) = std::fs::read_dir(post_dir) else {
            return BTreeSet::new();
        };

        read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name();
                FileManager::variant_language(&name.to_string_lossy()).map(String::from)
            })
            .collect()
    }

    /// Full URL of a post variant, from the variant's own `url` header
    /// field joined to the base URL. `None` when the variant file or the
    /// field is absent.
    fn variant_url(&self, post_dir: &Path, language: Option<&str>) -> Option<String> {
        let file = match language {
            Some(lang) if lang != DEFAULT_LANGUAGE => FileManager::variant_path(post_dir, lang),
            _ => FileManager::canonical_path(post_dir),
        };

        if !FileManager::file_exists(&file) {
            return None;
        }

        let doc = Document::parse(&FileManager::read_to_string(&file).ok()?);
        let url_path = doc.url()?;
        Some(format!("{}{}", self.base_url.trim_end_matches('/'), url_path))
    }
}
