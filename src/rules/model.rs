/*!
 * Data model for translation rulesets.
 */

use regex::Regex;
use std::collections::BTreeMap;

/// Kind of machine-checkable pattern attached to a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// The pattern must not appear in the translation
    Forbidden,
    /// The pattern must appear in the translation
    Required,
}

/// A compiled pattern check declared by a rule
#[derive(Debug, Clone)]
pub struct PatternCheck {
    /// Whether the pattern is forbidden or required
    pub kind: PatternKind,
    /// The compiled pattern, matched against the translated text
    pub pattern: Regex,
}

/// A single rule statement from a ruleset document
#[derive(Debug, Clone)]
pub struct Rule {
    /// Stable reference for reporting, e.g. "frFR/Style Guide #3"
    pub reference: String,
    /// The rule text as written, included verbatim in prompts
    pub text: String,
    /// Optional pattern check evaluated by the quality assessor
    pub check: Option<PatternCheck>,
    /// Whether a violation of this rule blocks acceptance
    pub critical: bool,
}

impl Rule {
    /// Create a plain guideline rule with no pattern check
    pub fn guideline(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            check: None,
            critical: false,
        }
    }

    /// Attach a forbidden pattern to this rule
    pub fn forbidding(mut self, pattern: Regex) -> Self {
        self.check = Some(PatternCheck {
            kind: PatternKind::Forbidden,
            pattern,
        });
        self
    }

    /// Attach a required pattern to this rule
    pub fn requiring(mut self, pattern: Regex) -> Self {
        self.check = Some(PatternCheck {
            kind: PatternKind::Required,
            pattern,
        });
        self
    }

    /// Mark the rule as blocking on violation
    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}

/// Ruleset for a single target language
///
/// Immutable once loaded; shared read-only across all records.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    /// Language code this ruleset applies to, e.g. "frFR"
    pub language_code: String,
    /// Mandated glossary translations, source term to target term
    pub glossary: BTreeMap<String, String>,
    /// Ordered rule statements
    pub rules: Vec<Rule>,
}

impl Ruleset {
    /// Create an empty ruleset for a language
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            glossary: BTreeMap::new(),
            rules: Vec::new(),
        }
    }

    /// Add a glossary term
    pub fn with_term(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.glossary.insert(source.into(), target.into());
        self
    }

    /// Add a rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Whether the ruleset carries no usable content
    pub fn is_empty(&self) -> bool {
        self.glossary.is_empty() && self.rules.is_empty()
    }
}
