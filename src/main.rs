// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, LogLevel};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod output;
mod pipeline;
mod providers;
mod qa;
mod record_processor;
mod rules;
mod translation;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// gameloc - AI-powered game text localization
///
/// Translates game text records from a CSV export into multiple target
/// languages, assessing every candidate against per-language rulesets and
/// retrying rejected translations with corrective feedback.
#[derive(Parser, Debug)]
#[command(name = "gameloc")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered game text localization pipeline")]
#[command(long_about = "gameloc translates game text CSV exports using an \
OpenAI-compatible model, checks every translation against per-language \
Markdown rulesets and retries rejected ones automatically.

EXAMPLES:
    gameloc strings.csv                          # Translate using default config
    gameloc -o out.csv -r rules/ strings.csv     # Explicit output and rules dir
    gameloc -l frFR,deDE strings.csv             # Only these target languages
    gameloc -m gpt-4o --max-attempts 5 strings.csv
    gameloc --no-auto-retry strings.csv          # Escalate on first failure
    gameloc --log-level debug strings.csv

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically. The API key is read from
    the config or the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    /// Input CSV file with the records to translate
    #[arg(value_name = "INPUT_CSV")]
    input: PathBuf,

    /// Output CSV file; also the resume source for interrupted runs
    #[arg(short, long, default_value = "translations.csv")]
    output: PathBuf,

    /// Directory holding the Markdown rulesets
    #[arg(short, long)]
    rules_dir: Option<String>,

    /// Comma-separated target language codes (e.g. 'frFR,deDE')
    #[arg(short, long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Total attempts allowed per record/language pair
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Escalate on the first failed assessment instead of retrying
    #[arg(long)]
    no_auto_retry: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
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
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &cli.config_path;
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .to_file(config_path)
            .with_context(|| format!("Failed to write default config to: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(rules_dir) = cli.rules_dir {
        config.rules_dir = rules_dir;
    }
    if let Some(languages) = cli.languages {
        config.languages = languages;
    }
    if let Some(model) = cli.model {
        config.provider.model = model;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.pipeline.max_attempts = max_attempts;
    }
    if cli.no_auto_retry {
        config.pipeline.auto_retry = false;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }

    // If log level was not set via command line, update it from config now
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&cli.input, &cli.output).await?;

    // A run with escalations completes but signals review is needed
    if summary.escalated > 0 {
        std::process::exit(2);
    }
    Ok(())
}
