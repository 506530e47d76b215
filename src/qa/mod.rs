/*!
 * Quality assessment for candidate translations.
 *
 * This module validates a translation attempt against language rules and
 * produces a structured report with severity-tagged findings:
 * - `placeholders`: placeholder/tag integrity (ordered token sequences)
 * - `glossary`: mandated terminology compliance
 * - `patterns`: forbidden/required rule patterns
 *
 * The report verdict is the sole gate for retry triggering: Fail iff any
 * finding is at or above the configured blocking severity (Critical by
 * default). High and lower findings are reported but non-blocking.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::record_processor::Record;
use crate::rules::{Rule, Ruleset};
use crate::translation::TranslationAttempt;

pub mod glossary;
pub mod patterns;
pub mod placeholders;

/// Severity of a quality finding, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks acceptance by default
    Critical,
    /// Major issue, reported but non-blocking
    High,
    /// Noticeable issue
    Medium,
    /// Minor issue
    Low,
    /// Informational only
    Info,
}

impl Severity {
    /// Numeric rank, 0 = most severe
    fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    /// Whether this severity is at least as severe as `other`
    pub fn at_least(self, other: Severity) -> bool {
        self.rank() <= other.rank()
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{}", name)
    }
}

/// A single quality issue found in a translation attempt
#[derive(Debug, Clone)]
pub struct QaFinding {
    /// Reference to the rule or built-in check that produced the finding
    pub rule_reference: String,
    /// Severity of the issue
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Byte span in the translated text, when locatable
    pub span: Option<(usize, usize)>,
}

impl QaFinding {
    /// Create a finding without a located span
    pub fn new(
        rule_reference: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule_reference: rule_reference.into(),
            severity,
            description: description.into(),
            span: None,
        }
    }

    /// Attach the located span
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}

/// Pass/fail verdict of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// No blocking findings
    Pass,
    /// At least one blocking finding
    Fail,
}

/// Structured result of assessing one translation attempt
#[derive(Debug, Clone)]
pub struct QaReport {
    /// Record the assessed attempt belongs to
    pub record_id: String,
    /// Target language of the attempt
    pub language_code: String,
    /// Attempt number the report refers to
    pub attempt_number: u32,
    /// Findings in check order
    pub findings: Vec<QaFinding>,
    /// Overall verdict
    pub verdict: Verdict,
}

impl QaReport {
    /// Whether the verdict is Pass
    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Findings severe enough to feed back to the translator on retry
    pub fn corrective_findings(&self) -> Vec<&QaFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity.at_least(Severity::High))
            .collect()
    }

    /// Short single-line summary for logs and output rows
    pub fn summary(&self) -> String {
        if self.findings.is_empty() {
            return "no findings".to_string();
        }
        self.findings
            .iter()
            .map(|f| format!("[{}] {}: {}", f.severity, f.rule_reference, f.description))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Configuration for the quality assessor
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Findings at or above this severity fail the verdict
    pub blocking_severity: Severity,
    /// Language code of the source text
    pub source_language: String,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            blocking_severity: Severity::Critical,
            source_language: "enUS".to_string(),
        }
    }
}

/// Quality assessor for candidate translations
#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    config: QaConfig,
}

impl QualityAssessor {
    /// Create an assessor with default configuration
    pub fn new() -> Self {
        Self::with_config(QaConfig::default())
    }

    /// Create an assessor with custom configuration
    pub fn with_config(config: QaConfig) -> Self {
        Self { config }
    }

    /// Assess one attempt against the record and its rulesets
    pub fn assess(
        &self,
        attempt: &TranslationAttempt,
        record: &Record,
        ruleset: &Ruleset,
        global_rules: &[Rule],
    ) -> QaReport {
        let mut findings = Vec::new();

        findings.extend(placeholders::check(&record.source_text, &attempt.text));
        findings.extend(glossary::check(
            &record.source_text,
            &attempt.text,
            &ruleset.glossary,
        ));
        findings.extend(self.check_empty_or_echo(attempt, record));
        findings.extend(patterns::check(&attempt.text, &ruleset.rules));
        findings.extend(patterns::check(&attempt.text, global_rules));

        let verdict = if findings
            .iter()
            .any(|f| f.severity.at_least(self.config.blocking_severity))
        {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        debug!(
            "Assessed {} ({}) attempt {}: {:?}, {} findings",
            attempt.record_id,
            attempt.language_code,
            attempt.attempt_number,
            verdict,
            findings.len()
        );

        QaReport {
            record_id: attempt.record_id.clone(),
            language_code: attempt.language_code.clone(),
            attempt_number: attempt.attempt_number,
            findings,
            verdict,
        }
    }

    /// Non-empty and non-echo checks
    fn check_empty_or_echo(&self, attempt: &TranslationAttempt, record: &Record) -> Vec<QaFinding> {
        let mut findings = Vec::new();

        if attempt.text.trim().is_empty() {
            findings.push(QaFinding::new(
                "qa/non-empty",
                Severity::Critical,
                "translation is empty",
            ));
            return findings;
        }

        let language_differs = attempt.language_code != self.config.source_language;
        if language_differs
            && attempt.text == record.source_text
            && placeholders::has_translatable_content(&record.source_text)
        {
            findings.push(QaFinding::new(
                "qa/non-echo",
                Severity::Critical,
                "translation is identical to the source text",
            ));
        }

        findings
    }
}
