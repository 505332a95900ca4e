// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::app_config::Config;
use crate::app_controller::{Controller, ScanOptions, TranslateOptions};

mod app_config;
mod app_controller;
mod document;
mod errors;
mod file_utils;
mod filters;
mod language_utils;
mod providers;
mod report;
mod scanner;
mod translation;
mod verification;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<app_config::LogLevel> for LevelFilter {
    fn from(level: app_config::LogLevel) -> Self {
        match level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the content tree for missing translations
    Scan(ScanArgs),

    /// Translate missing posts listed in a coverage report
    Translate(TranslateArgs),

    /// Generate shell completions for postglot
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Path to the content directory
    #[arg(long, default_value = "content")]
    content: PathBuf,

    /// Path to the site configuration file
    #[arg(long, default_value = "config.yml")]
    site_config: PathBuf,

    /// Output file path for the JSON report
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Path to the coverage report driving the run
    #[arg(value_name = "REPORT")]
    report: PathBuf,

    /// Repository root the report paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Translate only to a specific language code (e.g. ar, de, fr)
    #[arg(short, long)]
    lang: Option<String>,

    /// Translate only posts whose path contains this substring
    #[arg(short, long)]
    post: Option<String>,

    /// Limit number of posts to translate
    #[arg(long)]
    limit: Option<usize>,

    /// Show what would be translated without translating
    #[arg(long)]
    dry_run: bool,

    /// Output file path for the translation task report
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// postglot - blog post translation coverage scanner and driver
///
/// Scans a content tree for posts with missing translations and drives an
/// automated translate, save, verify, retry pipeline against an
/// OpenAI-compatible endpoint.
#[derive(Parser, Debug)]
#[command(name = "postglot")]
#[command(version = "1.0.0")]
#[command(about = "Blog post translation scanner and driver")]
#[command(long_about = "postglot finds blog posts that lack translated variants and fills the \
gaps with an LLM provider.

EXAMPLES:
    postglot scan                                   # Scan using defaults
    postglot scan -o translations_scan_report.json  # Also write the JSON report
    postglot translate report.json                  # Translate everything missing
    postglot translate report.json --lang ar        # One language only
    postglot translate report.json --limit 5        # First five posts only
    postglot completions bash > postglot.bash       # Generate bash completions

CONFIGURATION:
    Tool settings live in conf.json (created with defaults on first run).
    The target-language list and base URL are read from the site's
    config.yml. The provider API key comes from the TRANSLATION_API_KEY
    environment variable; TRANSLATION_API_URL and TRANSLATION_MODEL
    override the configured endpoint and model.

EXIT CODES:
    scan       0 when every post is fully translated, 1 otherwise
    translate  0 on success or no-op, 1 when any task failed")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize the logger once with info level by default; the level is
    // raised or lowered after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        log::set_max_level(level.clone().into());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "postglot", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan(args) => {
            let config = load_config(&cli.config_path, cli.log_level.is_none())?;
            run_scan(config, args)
        }
        Commands::Translate(args) => {
            let config = load_config(&cli.config_path, cli.log_level.is_none())?;
            run_translate(config, args).await
        }
    }
}

/// Load or create the tool configuration, applying its log level unless the
/// command line already set one.
fn load_config(config_path: &str, apply_log_level: bool) -> Result<Config> {
    let config =
        Config::load_or_create(config_path).context("Configuration loading failed")?;

    if apply_log_level {
        log::set_max_level(config.log_level.clone().into());
    }

    Ok(config)
}

fn run_scan(config: Config, args: ScanArgs) -> Result<ExitCode> {
    let controller = Controller::with_config(config);
    let report = controller.run_scan(&ScanOptions {
        content_root: args.content,
        site_config: args.site_config,
        output: args.output,
    })?;

    // Non-zero exit keeps CI red while any coverage gap exists
    if report.summary.all_complete {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_translate(config: Config, args: TranslateArgs) -> Result<ExitCode> {
    let controller = Controller::with_config(config);
    let summary = controller
        .run_translate(&TranslateOptions {
            report: args.report,
            root: args.root,
            language: args.lang,
            post: args.post,
            limit: args.limit,
            dry_run: args.dry_run,
            output: args.output,
        })
        .await?;

    if summary.failed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
