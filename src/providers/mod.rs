/*!
 * Model gateway implementations.
 *
 * This module contains client implementations for LLM backends used to
 * produce candidate translations:
 * - OpenAI: OpenAI-compatible chat completions API
 * - Mock: scripted gateway for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A structured completion request sent to a model gateway
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// System prompt carrying the ruleset and instructions
    pub system: String,
    /// User prompt carrying the source text, context and feedback
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with default sampling parameters
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
            max_tokens: 2048,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the generation budget
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Common trait for all model gateways
///
/// Implementations own their transport concerns: timeouts, rate limiting and
/// a bounded internal retry budget for transient failures. Callers see one
/// `complete` call per logical request.
#[async_trait]
pub trait ModelGateway: Send + Sync + Debug {
    /// Complete a request, returning the raw model text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Model identifier this gateway is configured for
    fn model_name(&self) -> &str;
}

pub mod mock;
pub mod openai;
