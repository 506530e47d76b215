/*!
 * Placeholder and markup integrity checks.
 *
 * Game text carries three kinds of non-translatable tokens:
 * - placeholders like `{Count}`
 * - pipe functions like `|hpp(count)`
 * - markup tags like `<b>` and `</b>`
 *
 * All tokens from the source must appear in the translation, unmodified and
 * in the same order. Any deviation is a Critical finding.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{QaFinding, Severity};

/// Matches any non-translatable token in source or translated text
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[A-Za-z0-9_]+\}|\|[a-z]+\([^)]*\)|</?[A-Za-z][^<>]*>")
        .expect("invalid token regex")
});

/// Extract all non-translatable tokens in order of appearance
pub fn extract_tokens(text: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether the text contains anything beyond tokens and punctuation
pub fn has_translatable_content(text: &str) -> bool {
    let stripped = TOKEN_REGEX.replace_all(text, "");
    stripped.chars().any(|c| c.is_alphabetic())
}

/// Compare token sequences between source and translation
///
/// Returns at most one finding; the description names the first divergence
/// so the translator can be pointed at it on retry.
pub fn check(source: &str, translation: &str) -> Vec<QaFinding> {
    let expected = extract_tokens(source);
    let found = extract_tokens(translation);

    if expected == found {
        return Vec::new();
    }

    let description = describe_mismatch(&expected, &found);

    let finding = match first_divergence(&found, &expected)
        .and_then(|token| translation.find(token.as_str()).map(|at| (at, token.len())))
    {
        Some((at, len)) => {
            QaFinding::new("qa/placeholders", Severity::Critical, description).with_span(at, at + len)
        }
        None => QaFinding::new("qa/placeholders", Severity::Critical, description),
    };

    vec![finding]
}

/// First token in `found` that diverges from `expected`
fn first_divergence<'a>(found: &'a [String], expected: &[String]) -> Option<&'a String> {
    found
        .iter()
        .zip(expected.iter())
        .find(|(f, e)| f != e)
        .map(|(f, _)| f)
        .or_else(|| found.get(expected.len()))
}

fn describe_mismatch(expected: &[String], found: &[String]) -> String {
    if expected.len() != found.len() {
        return format!(
            "token count mismatch: source has {} [{}], translation has {} [{}]",
            expected.len(),
            expected.join(", "),
            found.len(),
            found.join(", ")
        );
    }
    for (e, f) in expected.iter().zip(found.iter()) {
        if e != f {
            return format!("token altered or reordered: expected {} but found {}", e, f);
        }
    }
    "token sequence mismatch".to_string()
}
