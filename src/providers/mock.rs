/*!
 * Mock gateway implementation for testing.
 *
 * This module provides a scripted gateway that replays a fixed sequence of
 * replies and records every request it receives:
 * - `MockGateway::working()` - always echoes a translated-looking text
 * - `MockGateway::scripted(...)` - replays replies in order
 * - `MockGateway::failing()` - always fails with a connection error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;

use super::{CompletionRequest, ModelGateway};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with the given text
    Text(String),
    /// Succeed with blank output
    Blank,
    /// Fail with a connection error
    Unavailable,
    /// Fail with a rate-limit error
    RateLimited,
}

/// Scripted model gateway for tests
#[derive(Debug, Clone)]
pub struct MockGateway {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    fallback: MockReply,
    model: String,
}

impl MockGateway {
    /// Gateway replaying the given replies in order, then the fallback
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fallback: MockReply::Unavailable,
            model: "mock-model".to_string(),
        }
    }

    /// Gateway that always succeeds, tagging the user prompt
    pub fn working() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fallback: MockReply::Text("[translated]".to_string()),
            model: "mock-model".to_string(),
        }
    }

    /// Gateway that always fails with a connection error
    pub fn failing() -> Self {
        Self::scripted(Vec::new())
    }

    /// Gateway that always returns blank output
    pub fn blank() -> Self {
        let mut gateway = Self::scripted(Vec::new());
        gateway.fallback = MockReply::Blank;
        gateway
    }

    /// What to reply once the script is exhausted
    pub fn with_fallback(mut self, fallback: MockReply) -> Self {
        self.fallback = fallback;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of completion calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request.clone());

        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Blank => Ok(String::new()),
            MockReply::Unavailable => Err(ProviderError::ConnectionError(
                "simulated connection failure".to_string(),
            )),
            MockReply::RateLimited => Err(ProviderError::RateLimitExceeded(
                "simulated rate limit".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
