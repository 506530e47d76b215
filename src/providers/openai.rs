/*!
 * OpenAI-compatible chat completions client.
 *
 * Works against the public OpenAI API and any server exposing the same
 * /v1/chat/completions surface. Transient failures (network errors, 429,
 * 5xx) are retried internally with exponential backoff and jitter before
 * surfacing to the caller.
 */

use async_trait::async_trait;
use log::{error, warn};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;

use super::{CompletionRequest, ModelGateway};

/// Default public API endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// OpenAI client for chat completion requests
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model this gateway sends requests for
    model: String,
    /// Maximum number of retry attempts for transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Chat message in the OpenAI wire format
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Message content of a choice
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OpenAI {
    /// Create a new client with default retry settings
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new_with_config(api_key, model, String::new(), 3, 1000, 120)
    }

    /// Create a new client with explicit retry and timeout configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = {
            let e = endpoint.into();
            if e.is_empty() { DEFAULT_ENDPOINT.to_string() } else { e }
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint,
            model: model.into(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Backoff delay before the given retry attempt, with jitter
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.backoff_base_ms * (1u64 << attempt.min(6));
        let jittered = rand::rng().random_range(base / 2..=base + base / 2);
        Duration::from_millis(jittered)
    }

    /// Send one request without retrying
    async fn send_once(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(message),
                429 => ProviderError::RateLimitExceeded(message),
                code => ProviderError::ApiError {
                    status_code: code,
                    message,
                },
            });
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }
}

/// Whether an error is worth retrying
fn is_transient(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

#[async_trait]
impl ModelGateway for OpenAI {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.send_once(request).await {
                Ok(text) => return Ok(text),
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "OpenAI request failed ({}), retrying in {:?} - attempt {}/{}",
                        e,
                        delay,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => {
                    error!("OpenAI request failed: {}", e);
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
