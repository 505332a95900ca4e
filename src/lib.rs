/*!
 * # postglot - Blog Post Translation Scanner & Driver
 *
 * A Rust library for tracking blog posts with missing translations and
 * driving an automated translate, save, verify, retry pipeline that fills
 * the gaps using an LLM provider.
 *
 * ## Features
 *
 * - Scan a content tree for posts lacking translated variants
 * - Composable exclusion filters (archived posts, publish-date ranges,
 *   arbitrary tags)
 * - Stable JSON coverage reports for downstream tooling
 * - Front-matter aware translation that preserves markup and rewrites URLs
 * - Structural verification of produced artifacts with bounded retries and
 *   cleanup of rejected files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management (site config, tool config, env)
 * - `document`: Front-matter document model
 * - `filters`: Exclusion filter chain for the scanner
 * - `scanner`: Coverage scanner
 * - `report`: Report schemas and writers
 * - `translation`: Translation engine and the retry state machine
 * - `verification`: Structural artifact verification
 * - `providers`: Client implementations for translation backends:
 *   - `providers::chat`: OpenAI-compatible chat-completions client
 *   - `providers::mock`: Scripted provider for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod filters;
pub mod language_utils;
pub mod providers;
pub mod report;
pub mod scanner;
pub mod translation;
pub mod verification;

// Re-export main types for easier usage
pub use app_config::{Config, SiteConfig};
pub use document::Document;
pub use filters::{FilterChain, FilterKind, PostFilter};
pub use report::{CoverageReport, TranslationReport};
pub use scanner::CoverageScanner;
pub use translation::{RetryController, TranslationEngine};
pub use verification::{VerificationEngine, Verdict};
pub use errors::{AppError, ProviderError, TranslationError};
