/*!
 * Tests for the coverage scanner
 */

use std::fs;
use anyhow::Result;
use postglot::app_config::SiteConfig;
use postglot::filters::{FilterChain, FilterKind, PostFilter};
use postglot::scanner::CoverageScanner;
use crate::common;

fn scanner(site_config_dir: &std::path::Path) -> Result<CoverageScanner> {
    let site = SiteConfig::load(common::write_site_config(site_config_dir)?)?;
    Ok(CoverageScanner::new(&site, FilterChain::default()))
}

/// Scenario A: a post with only the canonical file misses every expected
/// language
#[test]
fn test_scan_withOnlyCanonicalFile_shouldReportAllLanguagesMissing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_sample_post(&content, "blog/my-post")?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.summary.total_posts_scanned, 1);
    assert_eq!(report.posts.len(), 1);
    let entry = &report.posts[0];
    assert_eq!(entry.path, "content/blog/my-post");
    assert_eq!(entry.missing_languages, vec!["ar", "de"]);
    assert_eq!(entry.missing_count, 2);
    assert_eq!(entry.total_expected, 2);
    assert!(!report.summary.all_complete);
    Ok(())
}

/// A post with every variant present never appears in the report
#[test]
fn test_scan_withCompletePost_shouldNotProduceEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    let post_dir = common::create_sample_post(&content, "blog/complete-post")?;
    common::create_variant(&post_dir, "ar", "---\ntitle: X\n---\n\nbody")?;
    common::create_variant(&post_dir, "de", "---\ntitle: X\n---\n\nbody")?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.summary.total_posts_scanned, 1);
    assert!(report.posts.is_empty());
    assert!(report.summary.all_complete);
    assert_eq!(report.summary.posts_complete, 1);
    Ok(())
}

#[test]
fn test_scan_withPartialVariants_shouldPreserveExpectedOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    let post_dir = common::create_sample_post(&content, "blog/partial-post")?;
    common::create_variant(&post_dir, "ar", "---\ntitle: X\n---\n\nbody")?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.posts[0].missing_languages, vec!["de"]);
    Ok(())
}

/// Scenario B: an archived post is excluded from totals and counted under
/// the archived filter
#[test]
fn test_scan_withArchivedPost_shouldExcludeAndCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_sample_post(&content, "blog/active-post")?;
    common::create_post(
        &content,
        "blog/old-post",
        "title: Old Post\ndate: Mon, 01 Sep 2025 10:00:00 +0000\ntags:\n  - zArchive\n",
        common::SAMPLE_BODY,
    )?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.summary.total_posts_scanned, 1);
    assert_eq!(report.summary.filters_counts["archived"], 1);
    assert_eq!(report.posts.len(), 1);
    assert_eq!(report.posts[0].path, "content/blog/active-post");
    Ok(())
}

/// Scenario C: a pre-2025 post is excluded by date_range, but an
/// unparseable date falls through
#[test]
fn test_scan_withDateFilter_shouldExcludeOldButKeepUnparseable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_post(
        &content,
        "blog/ancient-post",
        "title: Ancient\ndate: Tue, 12 Mar 2019 08:30:00 +0000\n",
        common::SAMPLE_BODY,
    )?;
    common::create_post(
        &content,
        "blog/undated-post",
        "title: Undated\ndate: not-a-date\n",
        common::SAMPLE_BODY,
    )?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.summary.filters_counts["date_range"], 1);
    assert_eq!(report.summary.total_posts_scanned, 1);
    assert_eq!(report.posts[0].path, "content/blog/undated-post");
    Ok(())
}

/// total_posts_scanned = directories found - filtered posts
#[test]
fn test_scan_totals_shouldSubtractFilteredPosts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_sample_post(&content, "blog/post-a")?;
    common::create_sample_post(&content, "blog/post-b")?;
    common::create_post(
        &content,
        "blog/post-c",
        "title: C\ntags:\n  - zArchive\n",
        common::SAMPLE_BODY,
    )?;
    common::create_post(
        &content,
        "blog/post-d",
        "title: D\ndate: Tue, 12 Mar 2019 08:30:00 +0000\n",
        common::SAMPLE_BODY,
    )?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    let filtered: usize = report.summary.filters_counts.values().sum();
    assert_eq!(filtered, 2);
    assert_eq!(report.summary.total_posts_scanned, 4 - filtered);
    Ok(())
}

/// A post with an unparseable header is still scanned (filters fail open)
#[test]
fn test_scan_withBrokenHeader_shouldStillScanPost() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    let post_dir = content.join("blog/broken-post");
    fs::create_dir_all(&post_dir)?;
    fs::write(post_dir.join("index.md"), "no front matter here, just text")?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    assert_eq!(report.summary.total_posts_scanned, 1);
    assert_eq!(report.posts[0].path, "content/blog/broken-post");
    assert!(report.posts[0].url.is_none());
    Ok(())
}

/// URLs come from each variant's own front matter, joined to the base URL
#[test]
fn test_scan_shouldDeriveUrlsFromVariantHeaders() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    let post_dir = common::create_sample_post(&content, "blog/my-post")?;
    common::create_variant(
        &post_dir,
        "ar",
        "---\ntitle: X\nurl: /ar/comparison/compare-word-documents/\n---\n\nbody",
    )?;

    let report = scanner(temp_dir.path())?.scan(&content)?;

    let entry = &report.posts[0];
    assert_eq!(
        entry.url.as_deref(),
        Some("https://blog.example.com/comparison/compare-word-documents/")
    );
    assert_eq!(
        entry.urls["ar"],
        "https://blog.example.com/ar/comparison/compare-word-documents/"
    );
    assert_eq!(entry.missing_languages, vec!["de"]);
    Ok(())
}

/// Custom filter chains report their configuration in the summary
#[test]
fn test_scan_filtersApplied_shouldEchoConfiguration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = temp_dir.path().join("content");
    common::create_sample_post(&content, "blog/my-post")?;

    let site = SiteConfig::load(common::write_site_config(temp_dir.path())?)?;
    let chain = FilterChain::new(vec![PostFilter::new(FilterKind::Tag {
        tag: "draft".to_string(),
    })]);
    let report = CoverageScanner::new(&site, chain).scan(&content)?;

    assert_eq!(report.summary.filters_applied.len(), 1);
    assert_eq!(report.summary.filters_applied[0].name, "tag");
    assert_eq!(report.summary.filters_applied[0].config["tag"], "draft");
    Ok(())
}

#[test]
fn test_scan_withMissingContentDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = scanner(temp_dir.path())?.scan(&temp_dir.path().join("nope"));

    assert!(result.is_err());
    Ok(())
}
