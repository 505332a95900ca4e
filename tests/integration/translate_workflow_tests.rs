/*!
 * End-to-end tests for the translate command flow: scan, then drive the
 * translate-verify-retry pipeline with mock providers.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use postglot::app_config::Config;
use postglot::app_controller::{Controller, ScanOptions, TranslateOptions};
use postglot::providers::mock::MockProvider;
use postglot::report::TranslationReport;
use crate::common;

/// Builds a content tree with one post missing both languages, scans it and
/// returns (tempdir, report path)
fn scanned_fixture() -> Result<(TempDir, PathBuf)> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_sample_post(&content, "blog/my-post")?;
    let site_config = common::write_site_config(temp_dir.path())?;
    let report_path = temp_dir.path().join("report.json");

    let controller = Controller::with_config(Config::default());
    controller.run_scan(&ScanOptions {
        content_root: content,
        site_config,
        output: Some(report_path.clone()),
    })?;

    Ok((temp_dir, report_path))
}

fn options(root: &Path, report: &Path) -> TranslateOptions {
    TranslateOptions {
        report: report.to_path_buf(),
        root: root.to_path_buf(),
        language: None,
        post: None,
        limit: None,
        dry_run: false,
        output: None,
    }
}

#[tokio::test]
async fn test_translateRun_withWorkingProvider_shouldFillAllGaps() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    let output = temp_dir.path().join("translated.json");
    opts.output = Some(output.clone());

    let controller = Controller::with_config(Config::default());
    let summary = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::working()))
        .await?;

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 0);

    let post_dir = temp_dir.path().join("content/blog/my-post");
    assert!(post_dir.join("index.ar.md").exists());
    assert!(post_dir.join("index.de.md").exists());

    // The task report groups produced languages by post path
    let report = TranslationReport::load(&output)?;
    let entry = &report.posts["content/blog/my-post"];
    assert_eq!(entry.languages, vec!["ar", "de"]);
    assert_eq!(
        entry.url.as_deref(),
        Some("https://blog.example.com/comparison/compare-word-documents/")
    );
    Ok(())
}

#[tokio::test]
async fn test_translateRun_withLanguageSelection_shouldTranslateOnlyThat() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    opts.language = Some("ar".to_string());

    let controller = Controller::with_config(Config::default());
    let summary = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::working()))
        .await?;

    assert_eq!(summary.succeeded(), 1);
    let post_dir = temp_dir.path().join("content/blog/my-post");
    assert!(post_dir.join("index.ar.md").exists());
    assert!(!post_dir.join("index.de.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_translateRun_withUnknownLanguage_shouldFailFast() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    opts.language = Some("xx".to_string());

    let controller = Controller::with_config(Config::default());
    let result = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::working()))
        .await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_translateRun_withFailingProvider_shouldReportFailures() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    // One language keeps the fixed retry pauses to a single task
    opts.language = Some("ar".to_string());

    let controller = Controller::with_config(Config::default());
    let summary = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::failing()))
        .await?;

    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.failed(), 1);
    assert!(summary.report.is_empty());

    // Failed tasks leave no artifacts behind
    let post_dir = temp_dir.path().join("content/blog/my-post");
    assert!(!post_dir.join("index.ar.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_translateRun_withDryRun_shouldTouchNothing() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    opts.dry_run = true;

    let controller = Controller::with_config(Config::default());
    let summary = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::working()))
        .await?;

    assert!(summary.outcomes.is_empty());
    let post_dir = temp_dir.path().join("content/blog/my-post");
    assert!(!post_dir.join("index.ar.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_translateRun_withPostFilterMiss_shouldFail() -> Result<()> {
    let (temp_dir, report_path) = scanned_fixture()?;
    let mut opts = options(temp_dir.path(), &report_path);
    opts.post = Some("no-such-post".to_string());

    let controller = Controller::with_config(Config::default());
    let result = controller
        .run_translate_with_provider(&opts, Arc::new(MockProvider::working()))
        .await;

    assert!(result.is_err());
    Ok(())
}
