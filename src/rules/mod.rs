/*!
 * Ruleset loading and representation for language-specific translation rules.
 *
 * Rulesets are Markdown documents, one per target language plus an optional
 * global ruleset applied to every language. Each document contributes a
 * glossary (source term to mandated target term) and ordered rule statements,
 * some of which carry machine-checkable forbidden/required patterns.
 *
 * - `model`: Ruleset, Rule and pattern check types
 * - `parser`: Markdown section/glossary/rule extraction
 * - `store`: Directory loading and per-language lookup
 */

pub mod model;
pub mod parser;
pub mod store;

pub use model::{PatternCheck, PatternKind, Rule, Ruleset};
pub use store::RulesetStore;
