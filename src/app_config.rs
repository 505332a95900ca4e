use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::filters::FilterChain;
use crate::language_utils;
use crate::verification::VerificationConfig;

/// Application configuration module
///
/// Two configuration surfaces exist:
/// - the site configuration (`config.yml`), owned by the website build,
///   from which the target-language list and base URL are read;
/// - the tool configuration (`conf.json`), owned by this tool, carrying
///   scanner filters, translation settings and verification thresholds.
///
/// Provider credentials never live in either file; they come from
/// environment variables only.

/// The canonical language; its document carries no language suffix
pub const DEFAULT_LANGUAGE: &str = "en";

/// Environment variable holding the provider API key (required to translate)
pub const ENV_API_KEY: &str = "TRANSLATION_API_KEY";

/// Environment variable overriding the provider endpoint
pub const ENV_API_URL: &str = "TRANSLATION_API_URL";

/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "TRANSLATION_MODEL";

/// Site configuration: the subset of the website's `config.yml` this tool
/// reads.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SiteConfig {
    /// Public base URL the site is served from
    #[serde(rename = "baseURL", default = "default_base_url")]
    pub base_url: String,

    /// Configured site languages; keys are language codes, values are the
    /// site's per-language parameters (opaque to this tool)
    #[serde(default)]
    pub languages: BTreeMap<String, serde_yaml::Value>,
}

impl SiteConfig {
    /// Load the site configuration from a YAML file.
    ///
    /// A missing or unparseable file is a fatal configuration error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Cannot read site config {:?}: {}", path, e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Cannot parse site config {:?}: {}", path, e)))
    }

    /// The target-language list: configured codes minus the canonical
    /// language, lower-cased, unique, in stable sorted order.
    pub fn expected_languages(&self) -> Vec<String> {
        self.languages
            .keys()
            .map(|code| language_utils::normalize_code(code))
            .filter(|code| code != DEFAULT_LANGUAGE)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Scanner section of the tool configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScannerConfig {
    /// Exclusion filters, evaluated in order
    #[serde(default)]
    pub filters: FilterChain,
}

/// Translation section of the tool configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// OpenAI-compatible service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature parameter for text generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum attempts per translation task
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl TranslationConfig {
    /// Resolve the endpoint, letting the environment override the file
    pub fn resolve_endpoint(&self) -> String {
        std::env::var(ENV_API_URL).unwrap_or_else(|_| self.endpoint.clone())
    }

    /// Resolve the model name, letting the environment override the file
    pub fn resolve_model(&self) -> String {
        std::env::var(ENV_MODEL).unwrap_or_else(|_| self.model.clone())
    }

    /// Resolve the API key from the environment.
    ///
    /// Credentials are environment-only; a missing key aborts the translate
    /// command before any work starts.
    pub fn resolve_api_key(&self) -> Result<String, AppError> {
        std::env::var(ENV_API_KEY)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!("Missing environment variable: {}", ENV_API_KEY))
            })
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Represents the tool configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Scanner config
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Verification config
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Config {
    /// Load the tool configuration, creating a default file when absent.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
            config.validate()?;
            Ok(config)
        } else {
            log::warn!("Config file not found at {:?}, creating default config.", path);
            let config = Config::default();
            let content = serde_json::to_string_pretty(&config)?;
            FileManager::write_to_file(path, &content)?;
            Ok(config)
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.translation.endpoint.is_empty() {
            return Err(anyhow!("Translation endpoint must not be empty"));
        }
        if self.translation.max_retries == 0 {
            return Err(anyhow!("max_retries must be at least 1"));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://blog.example.com/".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}
