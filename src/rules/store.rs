/*!
 * Ruleset directory loading and per-language lookup.
 *
 * The rules directory holds one Markdown file per language, named after the
 * language code ("frFR.md" or "frFR_ruleset.md"), plus an optional global
 * file ("global.md" or "global_ruleset.md") whose rules apply to every
 * language. Files that fail to parse are skipped with a logged error; a run
 * with no loadable rulesets at all is fatal.
 */

use log::{error, info};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::RulesetError;

use super::model::{Rule, Ruleset};
use super::parser::parse_ruleset;

/// File stem (or prefix) identifying the global ruleset
const GLOBAL_STEM: &str = "global";

/// Loaded rulesets for a run, shared read-only
#[derive(Debug, Clone, Default)]
pub struct RulesetStore {
    rulesets: HashMap<String, Ruleset>,
    global_rules: Vec<Rule>,
}

impl RulesetStore {
    /// Build a store from already-constructed parts, mainly for tests
    pub fn from_parts(rulesets: Vec<Ruleset>, global_rules: Vec<Rule>) -> Self {
        Self {
            rulesets: rulesets
                .into_iter()
                .map(|r| (r.language_code.clone(), r))
                .collect(),
            global_rules,
        }
    }

    /// Load every Markdown ruleset under a directory
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RulesetError> {
        let dir = dir.as_ref();
        let mut store = Self::default();

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    error!("Failed to read ruleset file {}: {}", path.display(), e);
                    continue;
                }
            };

            let language = language_from_stem(stem);
            match parse_ruleset(&language, &content) {
                Ok(ruleset) if language == GLOBAL_STEM => {
                    store.global_rules.extend(ruleset.rules);
                }
                Ok(ruleset) => {
                    if ruleset.is_empty() {
                        error!("Ruleset {} parsed but contains no rules or glossary", path.display());
                    }
                    store.rulesets.insert(language, ruleset);
                }
                Err(e) => {
                    error!("Failed to parse ruleset {}: {}", path.display(), e);
                }
            }
        }

        if store.rulesets.is_empty() {
            return Err(RulesetError::Empty(dir.display().to_string()));
        }

        info!(
            "Loaded rulesets for {} languages ({} global rules)",
            store.rulesets.len(),
            store.global_rules.len()
        );
        Ok(store)
    }

    /// Look up the ruleset for a language
    pub fn get(&self, language_code: &str) -> Option<&Ruleset> {
        self.rulesets.get(language_code)
    }

    /// Look up the ruleset for a language, erroring when none is loaded
    pub fn require(&self, language_code: &str) -> Result<&Ruleset, RulesetError> {
        self.rulesets
            .get(language_code)
            .ok_or_else(|| RulesetError::NotFound(language_code.to_string()))
    }

    /// Rules applied to every language
    pub fn global_rules(&self) -> &[Rule] {
        &self.global_rules
    }

    /// Language codes with a loaded ruleset, sorted
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.rulesets.keys().cloned().collect();
        languages.sort();
        languages
    }
}

/// Derive the language code from a file stem like "frFR_ruleset"
fn language_from_stem(stem: &str) -> String {
    let prefix = stem.split('_').next().unwrap_or(stem);
    prefix.to_string()
}
