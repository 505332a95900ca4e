/*!
 * Tests for configuration loading and defaults
 */

use anyhow::Result;
use postglot::app_config::{Config, SiteConfig};
use crate::common;

/// Expected languages exclude the canonical language and come back sorted
#[test]
fn test_expectedLanguages_shouldExcludeDefaultAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::write_site_config(temp_dir.path())?;

    let site = SiteConfig::load(&config_path)?;

    assert_eq!(site.expected_languages(), vec!["ar", "de"]);
    assert_eq!(site.base_url, "https://blog.example.com/");
    Ok(())
}

#[test]
fn test_siteConfigLoad_withMissingFile_shouldBeConfigError() {
    let result = SiteConfig::load("does-not-exist/config.yml");
    assert!(result.is_err());
}

#[test]
fn test_expectedLanguages_shouldLowercaseCodes() {
    let site: SiteConfig = serde_yaml::from_str(
        "baseURL: https://blog.example.com/\nlanguages:\n  EN: {}\n  AR: {}\n  de: {}\n",
    )
    .expect("site config should parse");

    assert_eq!(site.expected_languages(), vec!["ar", "de"]);
}

#[test]
fn test_configDefault_shouldCarryScannerAndRetryDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.max_retries, 3);
    assert_eq!(config.verification.min_total_chars, 100);
    assert_eq!(config.verification.min_body_chars, 50);
    assert_eq!(config.scanner.filters.enabled_filters().count(), 2);
}

#[test]
fn test_configValidate_withZeroRetries_shouldFail() {
    let mut config = Config::default();
    config.translation.max_retries = 0;

    assert!(config.validate().is_err());
}

/// The default config round-trips through the JSON file format
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(created.translation.max_retries, reloaded.translation.max_retries);
    assert_eq!(created.translation.endpoint, reloaded.translation.endpoint);
    Ok(())
}
