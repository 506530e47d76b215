/*!
 * Retry coordination for one record/language pair.
 *
 * The coordinator owns the attempt budget and the pair state machine:
 *
 *   Pending -> Translating -> Assessing -> Accepted
 *                  ^              |
 *                  +-- Retrying <-+-> Escalated
 *
 * A pair is Accepted only on a Pass verdict. A Fail verdict triggers a
 * retry while budget remains and auto-retry is enabled; otherwise the pair
 * escalates with the last attempt attached for human review. Translator
 * errors consume budget without producing an attempt, so a pair can also
 * escalate with no text at all.
 */

use log::{info, warn};

use crate::qa::{QaReport, QualityAssessor, Verdict};
use crate::record_processor::Record;
use crate::rules::{Rule, Ruleset};
use crate::translation::{TranslationAttempt, Translator};

/// Attempt budget and retry policy
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Total attempts allowed per pair, including the first
    pub max_attempts: u32,
    /// Whether Fail verdicts trigger automatic retries
    pub auto_retry: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            auto_retry: true,
        }
    }
}

impl CoordinatorConfig {
    /// Clamp the budget to at least one attempt
    pub fn normalized(mut self) -> Self {
        if self.max_attempts == 0 {
            warn!("max_attempts of 0 clamped to 1");
            self.max_attempts = 1;
        }
        self
    }
}

/// Final status of a record/language pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// A passing translation was produced
    Accepted,
    /// No passing translation within budget, needs human review
    Escalated,
    /// The pair was never attempted, e.g. no ruleset for the language
    Skipped,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutcomeStatus::Accepted => "accepted",
            OutcomeStatus::Escalated => "escalated",
            OutcomeStatus::Skipped => "skipped",
        };
        write!(f, "{}", name)
    }
}

/// Terminal result for one record/language pair
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Record identifier
    pub record_id: String,
    /// Target language code
    pub language_code: String,
    /// Final status
    pub status: OutcomeStatus,
    /// Last produced text, also present on escalation for review
    pub final_text: Option<String>,
    /// Report of the last assessed attempt
    pub final_report: Option<QaReport>,
    /// Every attempt created, in order; kept for debug reporting
    pub attempts: Vec<TranslationAttempt>,
    /// Budget consumed, including translator calls that errored
    pub attempts_used: u32,
    /// Last translator error, when one contributed to escalation
    pub error: Option<String>,
}

impl TranslationOutcome {
    /// Outcome for a pair that was never attempted
    pub fn skipped(
        record_id: impl Into<String>,
        language_code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            language_code: language_code.into(),
            status: OutcomeStatus::Skipped,
            final_text: None,
            final_report: None,
            attempts: Vec::new(),
            attempts_used: 0,
            error: Some(reason.into()),
        }
    }
}

/// Pair state, advanced one step per loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairState {
    Pending,
    Translating,
    Assessing,
    Retrying,
    Accepted,
    Escalated,
}

/// Drives one record/language pair to a terminal outcome
#[derive(Debug, Clone)]
pub struct RetryCoordinator {
    translator: Translator,
    assessor: QualityAssessor,
    config: CoordinatorConfig,
}

impl RetryCoordinator {
    pub fn new(
        translator: Translator,
        assessor: QualityAssessor,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            translator,
            assessor,
            config: config.normalized(),
        }
    }

    /// Process one pair until Accepted or Escalated
    pub async fn process(
        &self,
        record: &Record,
        ruleset: &Ruleset,
        global_rules: &[Rule],
    ) -> TranslationOutcome {
        let mut state = PairState::Pending;
        let mut attempts_used: u32 = 0;
        let mut attempts: Vec<TranslationAttempt> = Vec::new();
        let mut last_report: Option<QaReport> = None;
        let mut last_error: Option<String> = None;
        // Set while Assessing, consumed by the verdict transition
        let mut pending_report: Option<QaReport> = None;

        loop {
            match state {
                PairState::Pending | PairState::Retrying => {
                    state = PairState::Translating;
                }
                PairState::Translating => {
                    let prior = attempts.last().zip(last_report.as_ref());
                    attempts_used += 1;

                    match self.translator.translate(record, ruleset, global_rules, prior).await {
                        Ok(attempt) => {
                            pending_report = Some(self.assessor.assess(
                                &attempt,
                                record,
                                ruleset,
                                global_rules,
                            ));
                            attempts.push(attempt);
                            state = PairState::Assessing;
                        }
                        Err(e) => {
                            warn!(
                                "Translation of {} ({}) failed on attempt {}: {}",
                                record.id, ruleset.language_code, attempts_used, e
                            );
                            last_error = Some(e.to_string());
                            state = if self.can_retry(attempts_used) {
                                PairState::Retrying
                            } else {
                                PairState::Escalated
                            };
                        }
                    }
                }
                PairState::Assessing => {
                    let report = pending_report.take().unwrap_or_else(|| {
                        // Unreachable by construction; treat as escalation
                        QaReport {
                            record_id: record.id.clone(),
                            language_code: ruleset.language_code.clone(),
                            attempt_number: attempts_used,
                            findings: Vec::new(),
                            verdict: Verdict::Fail,
                        }
                    });
                    let passed = report.verdict == Verdict::Pass;
                    last_report = Some(report);

                    state = if passed {
                        PairState::Accepted
                    } else if self.can_retry(attempts_used) {
                        PairState::Retrying
                    } else {
                        PairState::Escalated
                    };
                }
                PairState::Accepted => {
                    info!(
                        "Accepted {} ({}) after {} attempt(s)",
                        record.id, ruleset.language_code, attempts_used
                    );
                    return self.outcome(
                        record,
                        ruleset,
                        OutcomeStatus::Accepted,
                        attempts,
                        last_report,
                        attempts_used,
                        None,
                    );
                }
                PairState::Escalated => {
                    warn!(
                        "Escalating {} ({}) after {} attempt(s)",
                        record.id, ruleset.language_code, attempts_used
                    );
                    return self.outcome(
                        record,
                        ruleset,
                        OutcomeStatus::Escalated,
                        attempts,
                        last_report,
                        attempts_used,
                        last_error,
                    );
                }
            }
        }
    }

    fn can_retry(&self, attempts_used: u32) -> bool {
        self.config.auto_retry && attempts_used < self.config.max_attempts
    }

    #[allow(clippy::too_many_arguments)]
    fn outcome(
        &self,
        record: &Record,
        ruleset: &Ruleset,
        status: OutcomeStatus,
        attempts: Vec<TranslationAttempt>,
        last_report: Option<QaReport>,
        attempts_used: u32,
        error: Option<String>,
    ) -> TranslationOutcome {
        TranslationOutcome {
            record_id: record.id.clone(),
            language_code: ruleset.language_code.clone(),
            status,
            final_text: attempts.last().map(|a| a.text.clone()),
            final_report: last_report,
            attempts,
            attempts_used,
            error,
        }
    }
}
