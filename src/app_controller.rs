use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::chat::ChatClient;
use crate::report::{CoverageReport, TranslationReport};
use crate::scanner::CoverageScanner;
use crate::translation::{RetryController, TranslationEngine, TranslationOutcome, TranslationTask};
use crate::verification::VerificationEngine;

// @module: Application controller for scanning and translating

/// Options for the scan command
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Content directory to walk
    pub content_root: PathBuf,
    /// Path to the site configuration file
    pub site_config: PathBuf,
    /// Optional JSON report output path
    pub output: Option<PathBuf>,
}

/// Options for the translate command
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Coverage report driving the run
    pub report: PathBuf,
    /// Repository root the report paths are relative to
    pub root: PathBuf,
    /// Restrict the run to one target language
    pub language: Option<String>,
    /// Restrict the run to posts whose path contains this substring
    pub post: Option<String>,
    /// Translate at most this many posts
    pub limit: Option<usize>,
    /// List the work without translating
    pub dry_run: bool,
    /// Optional translation report output path
    pub output: Option<PathBuf>,
}

/// Aggregated result of one translate run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Every resolved task, in execution order
    pub outcomes: Vec<TranslationOutcome>,
    /// Task report of the successfully produced translations
    pub report: TranslationReport,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Run a coverage scan and print the console report.
    ///
    /// The JSON report is additionally written when an output path is set.
    /// The caller decides the exit code from `summary.all_complete`.
    pub fn run_scan(&self, options: &ScanOptions) -> Result<CoverageReport> {
        let site = crate::app_config::SiteConfig::load(&options.site_config)?;
        let scanner = CoverageScanner::new(&site, self.config.scanner.filters.clone());

        info!(
            "Expected languages: {}",
            scanner.expected_languages().join(", ")
        );

        let report = scanner.scan(&options.content_root)?;

        println!("{}", report.render_text());

        if let Some(output) = &options.output {
            report.save(output)?;
        }

        Ok(report)
    }

    /// Run the translation driver against a coverage report.
    ///
    /// Builds the provider from configuration and environment; fails before
    /// any work when credentials are missing.
    pub async fn run_translate(&self, options: &TranslateOptions) -> Result<RunSummary> {
        let report = CoverageReport::load(&options.report)?;
        let tasks = Self::build_tasks(&report, options)?;

        if tasks.is_empty() {
            return Ok(RunSummary::default());
        }

        if options.dry_run {
            println!("=== DRY RUN MODE ===");
            for task in &tasks {
                println!("{} -> {}", task.path, task.language);
            }
            return Ok(RunSummary::default());
        }

        let translation = &self.config.translation;
        let provider: Arc<dyn Provider> = Arc::new(ChatClient::new(
            translation.resolve_api_key()?,
            translation.resolve_endpoint(),
            translation.resolve_model(),
            translation.temperature,
            translation.timeout_secs,
        ));

        self.run_tasks(options, &report, tasks, provider).await
    }

    /// Same as [`Controller::run_translate`] but with an injected provider;
    /// used by tests and by callers embedding their own backend.
    pub async fn run_translate_with_provider(
        &self,
        options: &TranslateOptions,
        provider: Arc<dyn Provider>,
    ) -> Result<RunSummary> {
        let report = CoverageReport::load(&options.report)?;
        let tasks = Self::build_tasks(&report, options)?;
        if tasks.is_empty() || options.dry_run {
            return Ok(RunSummary::default());
        }
        self.run_tasks(options, &report, tasks, provider).await
    }

    /// Derive the task queue from the coverage report and the CLI
    /// selection. One task per (post, missing language), in report order.
    fn build_tasks(
        report: &CoverageReport,
        options: &TranslateOptions,
    ) -> Result<Vec<TranslationTask>> {
        if report.posts.is_empty() {
            info!("No posts with missing translations found in report.");
            return Ok(Vec::new());
        }

        info!("Found {} posts with missing translations", report.posts.len());

        if let Some(language) = &options.language {
            if !language_utils::is_known_code(language) {
                return Err(anyhow!("Unknown language code: {}", language));
            }
        }

        let mut posts: Vec<_> = report
            .posts
            .iter()
            .filter(|entry| {
                options
                    .post
                    .as_ref()
                    .is_none_or(|needle| entry.path.contains(needle.as_str()))
            })
            .collect();

        if posts.is_empty() {
            return Err(anyhow!(
                "No post found matching: {}",
                options.post.as_deref().unwrap_or_default()
            ));
        }

        if let Some(limit) = options.limit {
            posts.truncate(limit);
            info!("Limited to {} posts", posts.len());
        }

        let mut tasks = Vec::new();
        for entry in posts {
            let languages: Vec<&String> = match &options.language {
                Some(language) => {
                    if entry.missing_languages.contains(language) {
                        vec![language]
                    } else {
                        info!(
                            "Skipping {} - {} not in missing languages",
                            entry.path, language
                        );
                        continue;
                    }
                }
                None => entry.missing_languages.iter().collect(),
            };

            for language in languages {
                tasks.push(TranslationTask {
                    path: entry.path.clone(),
                    post_dir: options.root.join(&entry.path),
                    language: language.clone(),
                });
            }
        }

        Ok(tasks)
    }

    /// Resolve every task sequentially; a task completes all its retries
    /// before the next one starts.
    async fn run_tasks(
        &self,
        options: &TranslateOptions,
        report: &CoverageReport,
        tasks: Vec<TranslationTask>,
        provider: Arc<dyn Provider>,
    ) -> Result<RunSummary> {
        // A dead endpoint should be visible before the first task burns
        // through its retries, but it is not fatal here: individual tasks
        // still fail with their own diagnostics.
        if let Err(e) = provider.test_connection().await {
            warn!("Provider connection test failed: {}", e);
        }

        let engine = TranslationEngine::new(provider);
        let verifier = VerificationEngine::with_config(self.config.verification.clone());
        let controller = RetryController::new(
            engine,
            verifier,
            self.config.translation.max_retries,
            crate::translation::retry::RETRY_DELAY,
        );

        let progress = ProgressBar::new(tasks.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{pos}/{len} [{bar:30}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut summary = RunSummary::default();

        for task in &tasks {
            progress.set_message(format!("{} [{}]", task.path, task.language));
            let outcome = controller.run_task(task).await;

            if outcome.succeeded {
                let url = report
                    .posts
                    .iter()
                    .find(|entry| entry.path == outcome.path)
                    .and_then(|entry| entry.url.as_deref());
                summary.report.record(&outcome.path, &outcome.language, url);
            }

            summary.outcomes.push(outcome);
            progress.inc(1);
        }

        progress.finish_and_clear();

        info!("Total translations completed: {}", summary.succeeded());
        if summary.failed() > 0 {
            warn!("Total translations failed: {}", summary.failed());
        }

        if let Some(output) = &options.output {
            summary.report.save(output)?;
        }

        Ok(summary)
    }
}
