/*!
 * Run orchestration across records and languages.
 *
 * The orchestrator walks records in input order and, for each record, fans
 * the coordinator out over the target languages with a bounded concurrency.
 * Outcomes are emitted record-major with languages sorted, so the output is
 * deterministic regardless of completion order. Pairs already present in
 * the sink are skipped, which makes interrupted runs resumable.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::output::OutputSink;
use crate::record_processor::Record;
use crate::rules::RulesetStore;

use super::coordinator::{OutcomeStatus, RetryCoordinator, TranslationOutcome};

/// Tracks which pairs are claimed so no pair is processed twice
#[derive(Debug, Default)]
pub struct RunState {
    claimed: Mutex<HashSet<(String, String)>>,
}

impl RunState {
    /// State seeded with pairs that are already complete
    pub fn with_completed(completed: HashSet<(String, String)>) -> Self {
        Self {
            claimed: Mutex::new(completed),
        }
    }

    /// Claim a pair; false means it was already claimed or complete
    pub fn try_claim(&self, record_id: &str, language_code: &str) -> bool {
        self.claimed
            .lock()
            .insert((record_id.to_string(), language_code.to_string()))
    }
}

/// Counters for one finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pairs that produced a passing translation
    pub accepted: usize,
    /// Pairs handed off for human review
    pub escalated: usize,
    /// Pairs skipped for lack of a ruleset
    pub skipped: usize,
    /// Pairs already terminal in the sink before the run
    pub already_complete: usize,
}

impl RunSummary {
    /// Pairs this run actually processed
    pub fn processed(&self) -> usize {
        self.accepted + self.escalated + self.skipped
    }
}

/// Target languages and fan-out settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Target language codes, deduplicated and sorted before use
    pub languages: Vec<String>,
    /// Concurrent pairs in flight per record
    pub concurrency: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            concurrency: 4,
        }
    }
}

/// Drives a whole run over records and languages
pub struct Orchestrator {
    coordinator: Arc<RetryCoordinator>,
    store: Arc<RulesetStore>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        coordinator: Arc<RetryCoordinator>,
        store: Arc<RulesetStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            coordinator,
            store,
            config,
        }
    }

    /// Target languages in canonical (sorted, deduplicated) order
    fn canonical_languages(&self) -> Vec<String> {
        let mut languages = if self.config.languages.is_empty() {
            self.store.supported_languages()
        } else {
            self.config.languages.clone()
        };
        languages.sort();
        languages.dedup();
        languages
    }

    /// Process every record into every language, emitting as pairs finish
    ///
    /// `on_outcome` is invoked once per emitted pair, after the sink append.
    pub async fn run(
        &self,
        records: &[Record],
        sink: &dyn OutputSink,
        on_outcome: &(dyn Fn(&TranslationOutcome) + Send + Sync),
    ) -> Result<RunSummary> {
        let languages = self.canonical_languages();
        let state = RunState::with_completed(sink.completed_pairs()?);
        let concurrency = self.config.concurrency.max(1);
        let mut summary = RunSummary::default();

        info!(
            "Starting run: {} records x {} languages",
            records.len(),
            languages.len()
        );

        for record in records {
            let mut outcomes: Vec<TranslationOutcome> = stream::iter(languages.iter())
                .map(|language| {
                    let state = &state;
                    async move {
                        if !state.try_claim(&record.id, language) {
                            return None;
                        }
                        Some(self.process_pair(record, language).await)
                    }
                })
                .buffer_unordered(concurrency)
                .filter_map(|outcome| async move { outcome })
                .collect()
                .await;

            summary.already_complete += languages.len() - outcomes.len();

            // Deterministic emission: languages sorted within each record
            outcomes.sort_by(|a, b| a.language_code.cmp(&b.language_code));
            for outcome in outcomes {
                match outcome.status {
                    OutcomeStatus::Accepted => summary.accepted += 1,
                    OutcomeStatus::Escalated => summary.escalated += 1,
                    OutcomeStatus::Skipped => summary.skipped += 1,
                }
                sink.append(&outcome)?;
                on_outcome(&outcome);
            }
        }

        info!(
            "Run finished: {} accepted, {} escalated, {} skipped, {} already complete",
            summary.accepted, summary.escalated, summary.skipped, summary.already_complete
        );
        Ok(summary)
    }

    async fn process_pair(&self, record: &Record, language: &str) -> TranslationOutcome {
        match self.store.require(language) {
            Ok(ruleset) => {
                self.coordinator
                    .process(record, ruleset, self.store.global_rules())
                    .await
            }
            Err(e) => {
                warn!("Skipping record {} ({}): {}", record.id, language, e);
                TranslationOutcome::skipped(record.id.clone(), language, e.to_string())
            }
        }
    }
}
