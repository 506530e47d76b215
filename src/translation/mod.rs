/*!
 * Translation of game text records.
 *
 * This module turns one record and one target language into a candidate
 * translation via the configured model gateway:
 * - `prompts`: system/user prompt construction from rulesets and feedback
 * - `translator`: the gateway-facing translation step
 */

pub mod prompts;
pub mod translator;

pub use translator::{Translator, TranslatorConfig};

/// One candidate translation produced by the translator
#[derive(Debug, Clone)]
pub struct TranslationAttempt {
    /// Record the attempt belongs to
    pub record_id: String,
    /// Target language code
    pub language_code: String,
    /// 1-based attempt number within the record/language pair
    pub attempt_number: u32,
    /// The translated text
    pub text: String,
    /// Model that produced the text
    pub model_used: String,
}
