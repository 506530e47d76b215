use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::qa::Severity;

/// Application configuration module
/// This module handles loading, validating and saving the run configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code of the input texts
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language codes; empty means every language with a ruleset
    #[serde(default)]
    pub languages: Vec<String>,

    /// Directory holding the Markdown rulesets
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// Model gateway settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Attempt budget and retry policy
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model gateway settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to OPENAI_API_KEY when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; empty means the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Generation budget per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Transport retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in milliseconds between transport retries
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Attempt budget and retry policy for the pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Total attempts allowed per record/language pair
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Whether failed assessments trigger automatic retries
    #[serde(default = "default_auto_retry")]
    pub auto_retry: bool,

    /// Findings at or above this severity block acceptance
    #[serde(default = "default_blocking_severity")]
    pub blocking_severity: Severity,

    /// Concurrent record/language pairs in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Log level for the application
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

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "enUS".to_string()
}

fn default_rules_dir() -> String {
    "rules".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    3
}

fn default_auto_retry() -> bool {
    true
}

fn default_blocking_severity() -> Severity {
    Severity::Critical
}

fn default_concurrency() -> usize {
    4
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            auto_retry: default_auto_retry(),
            blocking_severity: default_blocking_severity(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            languages: Vec::new(),
            rules_dir: default_rules_dir(),
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("source_language must not be empty"));
        }
        if self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(anyhow!("languages must not contain empty codes"));
        }
        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("provider.model must not be empty"));
        }
        if !self.provider.endpoint.is_empty() {
            url::Url::parse(&self.provider.endpoint)
                .map_err(|e| anyhow!("provider.endpoint is not a valid URL: {}", e))?;
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(anyhow!(
                "provider.temperature must be between 0.0 and 2.0, got {}",
                self.provider.temperature
            ));
        }
        if self.provider.max_tokens == 0 {
            return Err(anyhow!("provider.max_tokens must be greater than 0"));
        }
        if self.pipeline.concurrency == 0 {
            return Err(anyhow!("pipeline.concurrency must be greater than 0"));
        }
        Ok(())
    }
}
