/*!
 * Prompt construction for translation requests.
 *
 * The system prompt carries the full ruleset for the target language:
 * global rules first, then language rules, then the glossary sorted by
 * source term. The user prompt carries the record itself and, on retry,
 * the rejected text together with the findings to correct.
 */

use std::fmt::Write;

use crate::qa::QaReport;
use crate::record_processor::Record;
use crate::rules::{Rule, Ruleset};

use super::TranslationAttempt;

/// Build the system prompt for one target language
pub fn build_system_prompt(ruleset: &Ruleset, global_rules: &[Rule]) -> String {
    let mut prompt = format!(
        "You are a professional game localization translator. Translate game text \
         from English (enUS) into {}.\n\n\
         Preserve all placeholders like {{Count}}, pipe functions like |hpp(count) \
         and markup tags like <b> exactly as written, in the same order. Never \
         translate, rename or drop them.\n",
        ruleset.language_code
    );

    if !global_rules.is_empty() {
        prompt.push_str("\nGeneral rules:\n");
        for rule in global_rules {
            let _ = writeln!(prompt, "- {}", rule.text);
        }
    }

    if !ruleset.rules.is_empty() {
        let _ = writeln!(prompt, "\nRules for {}:", ruleset.language_code);
        for rule in &ruleset.rules {
            let _ = writeln!(prompt, "- {}", rule.text);
        }
    }

    if !ruleset.glossary.is_empty() {
        prompt.push_str("\nGlossary (always use these translations):\n");
        for (term, target) in &ruleset.glossary {
            let _ = writeln!(prompt, "- {} => {}", term, target);
        }
    }

    prompt.push_str("\nRespond with the translated text only, no explanations or quotes.");
    prompt
}

/// Build the user prompt for one record
///
/// `prior` carries the rejected attempt and its report on retries.
pub fn build_user_prompt(
    record: &Record,
    prior: Option<(&TranslationAttempt, &QaReport)>,
) -> String {
    let mut prompt = format!("Source text:\n{}\n", record.source_text);

    if let Some(context) = &record.context {
        let _ = writeln!(prompt, "\nContext: {}", context);
    }
    if let Some(path) = &record.path {
        let _ = writeln!(prompt, "Asset path: {}", path);
    }

    if let Some((attempt, report)) = prior {
        let _ = writeln!(prompt, "\nYour previous translation was rejected:\n{}", attempt.text);
        prompt.push_str("\nIssues to correct:\n");
        for finding in report.corrective_findings() {
            let _ = writeln!(prompt, "- [{}] {}", finding.severity, finding.description);
        }
        prompt.push_str("\nProduce a corrected translation.");
    }

    prompt
}
