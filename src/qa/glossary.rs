/*!
 * Glossary compliance checks.
 *
 * When a source text contains a glossary term, the translation must use the
 * mandated target term. Matching on the source side is case-insensitive and
 * word-bounded so that "hunt" does not match inside "haunted"; matching on
 * the translation side is case-insensitive substring presence, since target
 * languages inflect.
 */

use regex::Regex;
use std::collections::BTreeMap;

use super::{QaFinding, Severity};

/// Check translated text against the mandated glossary
pub fn check(
    source: &str,
    translation: &str,
    glossary: &BTreeMap<String, String>,
) -> Vec<QaFinding> {
    let mut findings = Vec::new();
    let translation_lower = translation.to_lowercase();

    for (term, target) in glossary {
        if !source_contains_term(source, term) {
            continue;
        }
        if !translation_lower.contains(&target.to_lowercase()) {
            findings.push(QaFinding::new(
                "qa/glossary",
                Severity::High,
                format!("source term \"{}\" must be translated as \"{}\"", term, target),
            ));
        }
    }

    findings
}

/// Word-bounded, case-insensitive presence of a term in the source
fn source_contains_term(source: &str, term: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(source),
        // Terms that break the word-boundary pattern fall back to substring
        Err(_) => source.to_lowercase().contains(&term.to_lowercase()),
    }
}
