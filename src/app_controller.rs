/*!
 * Application controller.
 *
 * Wires the input records, rulesets, model gateway and pipeline together
 * for one run, and owns the user-facing progress reporting.
 */

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::output::{CsvSink, OutputSink};
use crate::pipeline::{
    CoordinatorConfig, Orchestrator, OrchestratorConfig, RetryCoordinator, RunSummary,
};
use crate::providers::openai::OpenAI;
use crate::providers::ModelGateway;
use crate::qa::{QaConfig, QualityAssessor};
use crate::record_processor::RecordProcessor;
use crate::rules::RulesetStore;
use crate::translation::{Translator, TranslatorConfig};

/// Environment variable consulted when the config carries no API key
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Controller for the batch translation run
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Run the pipeline end to end with the configured OpenAI gateway
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let api_key = if self.config.provider.api_key.is_empty() {
            std::env::var(API_KEY_ENV).unwrap_or_default()
        } else {
            self.config.provider.api_key.clone()
        };
        if api_key.is_empty() {
            warn!("No API key configured and {} is unset", API_KEY_ENV);
        }

        let gateway = OpenAI::new_with_config(
            api_key,
            self.config.provider.model.clone(),
            self.config.provider.endpoint.clone(),
            self.config.provider.max_retries,
            self.config.provider.backoff_base_ms,
            self.config.provider.timeout_secs,
        );

        self.run_with_gateway(Arc::new(gateway), input, output).await
    }

    /// Run the pipeline with an explicit gateway, the seam used by tests
    pub async fn run_with_gateway(
        &self,
        gateway: Arc<dyn ModelGateway>,
        input: &Path,
        output: &Path,
    ) -> Result<RunSummary> {
        let records = RecordProcessor::load_csv(input)?;
        let store = RulesetStore::load_dir(&self.config.rules_dir)
            .with_context(|| format!("Failed to load rulesets from {}", self.config.rules_dir))?;

        let languages = if self.config.languages.is_empty() {
            store.supported_languages()
        } else {
            self.config.languages.clone()
        };

        let translator = Translator::with_config(
            gateway,
            TranslatorConfig {
                temperature: self.config.provider.temperature,
                max_tokens: self.config.provider.max_tokens,
            },
        );
        let assessor = QualityAssessor::with_config(QaConfig {
            blocking_severity: self.config.pipeline.blocking_severity,
            source_language: self.config.source_language.clone(),
        });
        let coordinator = RetryCoordinator::new(
            translator,
            assessor,
            CoordinatorConfig {
                max_attempts: self.config.pipeline.max_attempts,
                auto_retry: self.config.pipeline.auto_retry,
            },
        );
        let orchestrator = Orchestrator::new(
            Arc::new(coordinator),
            Arc::new(store),
            OrchestratorConfig {
                languages: languages.clone(),
                concurrency: self.config.pipeline.concurrency,
            },
        );

        let sink = CsvSink::open(output)?;
        let already_done = sink.completed_pairs()?.len();
        let total_pairs = records.len() * languages.len();

        info!(
            "Translating {} records into {} languages ({} pairs, {} already done)",
            records.len(),
            languages.len(),
            total_pairs,
            already_done
        );

        let bar = ProgressBar::new(total_pairs as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pairs {msg}",
            )?
            .progress_chars("#>-"),
        );
        bar.inc(already_done.min(total_pairs) as u64);

        let summary = orchestrator
            .run(&records, &sink, &|outcome| {
                bar.set_message(format!(
                    "{} ({}) {}",
                    outcome.record_id, outcome.language_code, outcome.status
                ));
                bar.inc(1);
            })
            .await?;

        bar.finish_and_clear();

        info!(
            "Done: {} accepted, {} escalated, {} skipped, {} already complete",
            summary.accepted, summary.escalated, summary.skipped, summary.already_complete
        );
        if summary.escalated > 0 {
            warn!(
                "{} pair(s) escalated for human review, see {}",
                summary.escalated,
                output.display()
            );
        }

        Ok(summary)
    }
}
