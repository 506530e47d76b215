/*!
 * Markdown ruleset parsing.
 *
 * Ruleset documents use H2 sections. A "Glossary" section holds mandated
 * translations either as a Markdown table (| Term | Translation |) or as
 * simple "Term: Translation" lines. Every other section holds bullet rules.
 *
 * Bullet rules may declare machine-checkable patterns:
 *
 * ```markdown
 * - forbidden: `Démarrez` prefer the infinitive on buttons
 * - required: `\{Count\}` keep the count placeholder [critical]
 * ```
 *
 * A trailing `[critical]` tag promotes violations to blocking severity.
 */

use anyhow::{Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Rule, Ruleset};

/// Regex for H2 section headers
static SECTION_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^##\s+(.+?)\s*$").expect("Invalid section header regex")
});

/// Regex for glossary table rows: | Term | Translation | ...
static TABLE_ROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|").expect("Invalid table row regex")
});

/// Regex for simple "Term: Translation" glossary lines
static SIMPLE_TERM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\*{0,2}([^:|\n*]+?)\*{0,2}:\s*(.+?)\s*$").expect("Invalid term regex")
});

/// Regex for bullet rule lines
static BULLET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[-*]\s+(.+?)\s*$").expect("Invalid bullet regex")
});

/// Regex for an inline backtick pattern in forbidden/required rules
static INLINE_PATTERN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`]+)`").expect("Invalid inline pattern regex")
});

/// Tag marking a rule as blocking
const CRITICAL_TAG: &str = "[critical]";

/// Section title holding the glossary
const GLOSSARY_SECTION: &str = "glossary";

/// Parse a complete ruleset document for a language.
///
/// Content without any H2 headers yields an empty ruleset and a warning;
/// a missing glossary section is fine.
pub fn parse_ruleset(language_code: &str, content: &str) -> Result<Ruleset> {
    let mut ruleset = Ruleset::new(language_code);

    let sections = extract_sections(content);
    if sections.is_empty() {
        warn!("No sections found in ruleset for {}", language_code);
        return Ok(ruleset);
    }

    for (title, body) in sections {
        if title.to_lowercase() == GLOSSARY_SECTION {
            for (term, translation) in parse_glossary(&body) {
                ruleset.glossary.insert(term, translation);
            }
        } else {
            let mut index = 0;
            for bullet in BULLET_REGEX.captures_iter(&body) {
                index += 1;
                let reference = format!("{}/{} #{}", language_code, title, index);
                match parse_rule_line(&reference, &bullet[1]) {
                    Ok(rule) => ruleset.rules.push(rule),
                    Err(e) => warn!("Skipping malformed rule {}: {}", reference, e),
                }
            }
        }
    }

    debug!(
        "Parsed ruleset for {}: {} glossary terms, {} rules",
        language_code,
        ruleset.glossary.len(),
        ruleset.rules.len()
    );

    Ok(ruleset)
}

/// Split the document into (title, body) pairs on H2 headers
fn extract_sections(content: &str) -> Vec<(String, String)> {
    let headers: Vec<_> = SECTION_HEADER_REGEX.captures_iter(content).collect();
    let positions: Vec<(usize, usize, String)> = headers
        .iter()
        .map(|cap| {
            let whole = cap.get(0).expect("capture 0");
            (whole.start(), whole.end(), cap[1].to_string())
        })
        .collect();

    let mut sections = Vec::new();
    for (i, (_, body_start, title)) in positions.iter().enumerate() {
        let body_end = positions
            .get(i + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(content.len());
        let body = content[*body_start..body_end].trim().to_string();
        sections.push((title.clone(), body));
    }
    sections
}

/// Extract term/translation pairs from a glossary section body
fn parse_glossary(body: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut found_table = false;

    for cap in TABLE_ROW_REGEX.captures_iter(body) {
        let term = cap[1].trim().to_string();
        let translation = cap[2].trim().to_string();
        // Skip the header and separator rows of a Markdown table
        if term.eq_ignore_ascii_case("english")
            || term.eq_ignore_ascii_case("term")
            || term.chars().all(|c| c == '-' || c == ':')
        {
            continue;
        }
        found_table = true;
        entries.push((term, translation));
    }

    for cap in SIMPLE_TERM_REGEX.captures_iter(body) {
        if found_table && cap[0].contains('|') {
            continue;
        }
        let term = cap[1].trim().to_string();
        let translation = cap[2].trim().to_string();
        if !term.is_empty() && !translation.is_empty() {
            entries.push((term, translation));
        }
    }

    entries
}

/// Parse a single bullet rule line into a Rule
fn parse_rule_line(reference: &str, line: &str) -> Result<Rule> {
    let critical = line.contains(CRITICAL_TAG);
    let line = line.replace(CRITICAL_TAG, "");
    let line = line.trim();

    let rule = if let Some(rest) = line.strip_prefix("forbidden:") {
        let pattern = compile_inline_pattern(reference, rest)?;
        Rule::guideline(reference, rest.trim()).forbidding(pattern)
    } else if let Some(rest) = line.strip_prefix("required:") {
        let pattern = compile_inline_pattern(reference, rest)?;
        Rule::guideline(reference, rest.trim()).requiring(pattern)
    } else {
        Rule::guideline(reference, line)
    };

    Ok(if critical { rule.critical() } else { rule })
}

/// Compile the backtick-quoted pattern of a forbidden/required rule
fn compile_inline_pattern(reference: &str, rest: &str) -> Result<Regex> {
    let raw = INLINE_PATTERN_REGEX
        .captures(rest)
        .map(|cap| cap[1].to_string())
        .ok_or_else(|| anyhow!("rule {} declares a pattern check without a `pattern`", reference))?;
    Regex::new(&raw).map_err(|e| anyhow!("rule {} has an invalid pattern: {}", reference, e))
}
