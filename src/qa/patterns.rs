/*!
 * Pattern rule checks.
 *
 * Rules parsed from the Markdown rulesets can carry a machine-checkable
 * pattern: a forbidden pattern that must not match the translation, or a
 * required pattern that must. Forbidden hits are Medium, missing required
 * patterns are Low; rules tagged critical escalate to Critical either way.
 */

use crate::rules::{PatternKind, Rule};

use super::{QaFinding, Severity};

/// Check translated text against all pattern-bearing rules
pub fn check(translation: &str, rules: &[Rule]) -> Vec<QaFinding> {
    let mut findings = Vec::new();

    for rule in rules {
        let Some(check) = &rule.check else { continue };

        match check.kind {
            PatternKind::Forbidden => {
                if let Some(m) = check.pattern.find(translation) {
                    let severity = if rule.critical { Severity::Critical } else { Severity::Medium };
                    findings.push(
                        QaFinding::new(
                            rule.reference.clone(),
                            severity,
                            format!("forbidden pattern matched \"{}\": {}", m.as_str(), rule.text),
                        )
                        .with_span(m.start(), m.end()),
                    );
                }
            }
            PatternKind::Required => {
                if !check.pattern.is_match(translation) {
                    let severity = if rule.critical { Severity::Critical } else { Severity::Low };
                    findings.push(QaFinding::new(
                        rule.reference.clone(),
                        severity,
                        format!("required pattern not found: {}", rule.text),
                    ));
                }
            }
        }
    }

    findings
}
