/*!
 * The translation step.
 *
 * Sends one prompt per attempt through the model gateway and wraps the
 * reply as a `TranslationAttempt`. Gateway transport retries happen inside
 * the gateway; this layer only decides what the prompt says and validates
 * the reply shape.
 */

use log::debug;
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::{CompletionRequest, ModelGateway};
use crate::qa::QaReport;
use crate::record_processor::Record;
use crate::rules::{Rule, Ruleset};

use super::prompts;
use super::TranslationAttempt;

/// Sampling configuration for translation requests
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Generation budget per request
    pub max_tokens: u32,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

/// Produces candidate translations through a model gateway
#[derive(Debug, Clone)]
pub struct Translator {
    gateway: Arc<dyn ModelGateway>,
    config: TranslatorConfig,
}

impl Translator {
    /// Create a translator with default sampling settings
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self::with_config(gateway, TranslatorConfig::default())
    }

    /// Create a translator with explicit sampling settings
    pub fn with_config(gateway: Arc<dyn ModelGateway>, config: TranslatorConfig) -> Self {
        Self { gateway, config }
    }

    /// Translate one record into one target language
    ///
    /// `prior` carries the rejected attempt and its report on retries; the
    /// new attempt number is always prior + 1, or 1 on the first attempt.
    pub async fn translate(
        &self,
        record: &Record,
        ruleset: &Ruleset,
        global_rules: &[Rule],
        prior: Option<(&TranslationAttempt, &QaReport)>,
    ) -> Result<TranslationAttempt, TranslationError> {
        let attempt_number = prior.map_or(1, |(attempt, _)| attempt.attempt_number + 1);

        let request = CompletionRequest::new(
            self.gateway.model_name(),
            prompts::build_system_prompt(ruleset, global_rules),
            prompts::build_user_prompt(record, prior),
        )
        .temperature(self.config.temperature)
        .max_tokens(self.config.max_tokens);

        debug!(
            "Translating {} into {} (attempt {})",
            record.id, ruleset.language_code, attempt_number
        );

        let text = self.gateway.complete(&request).await?;
        let text = text.trim().to_string();

        if text.is_empty() {
            return Err(TranslationError::EmptyResponse {
                record_id: record.id.clone(),
                language_code: ruleset.language_code.clone(),
            });
        }

        Ok(TranslationAttempt {
            record_id: record.id.clone(),
            language_code: ruleset.language_code.clone(),
            attempt_number,
            text,
            model_used: self.gateway.model_name().to_string(),
        })
    }
}
