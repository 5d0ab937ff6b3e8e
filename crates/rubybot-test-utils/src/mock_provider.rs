// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion service for deterministic testing.
//!
//! `MockCompletion` implements `CompletionService` with pre-configured
//! replies and failures, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rubybot_core::RubyError;
use rubybot_core::traits::adapter::PluginAdapter;
use rubybot_core::traits::provider::CompletionService;
use rubybot_core::types::{AdapterType, CompletionRequest, HealthStatus};

/// Text returned when the reply queue is empty.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted outcome of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

/// A mock completion service.
///
/// Replies are popped from a FIFO queue. When the queue is empty
/// [`DEFAULT_REPLY`] is returned, unless the mock is set to fail every call.
pub struct MockCompletion {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl MockCompletion {
    /// Create a mock with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Create a mock pre-loaded with successful replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(MockReply::Text).collect(),
            )),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_failing(true);
        mock
    }

    /// Delay every call by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Toggle failure of every call, ignoring the queue.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Add a scripted outcome to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RubyError> {
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(RubyError::provider("mock completion failure"));
        }

        match self.replies.lock().await.pop_front() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(RubyError::provider(message)),
            None => Ok(DEFAULT_REPLY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str) -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            system_prompt: "persona".to_string(),
            user_message: message.to_string(),
            max_tokens: 100,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let mock = MockCompletion::new();
        assert_eq!(mock.complete(request("hi")).await.unwrap(), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let mock = MockCompletion::with_replies(vec!["first".into(), "second".into()]);
        assert_eq!(mock.complete(request("a")).await.unwrap(), "first");
        assert_eq!(mock.complete(request("b")).await.unwrap(), "second");
        assert_eq!(mock.complete(request("c")).await.unwrap(), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn scripted_failure_then_success() {
        let mock = MockCompletion::new();
        mock.push(MockReply::Fail("quota".into())).await;
        mock.push(MockReply::Text("ok".into())).await;

        assert!(mock.complete(request("a")).await.is_err());
        assert_eq!(mock.complete(request("b")).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn failing_mode_overrides_queue() {
        let mock = MockCompletion::with_replies(vec!["unused".into()]);
        mock.set_failing(true);
        assert!(matches!(
            mock.complete(request("a")).await,
            Err(RubyError::Provider { .. })
        ));
        mock.set_failing(false);
        assert_eq!(mock.complete(request("b")).await.unwrap(), "unused");
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockCompletion::failing();
        let _ = mock.complete(request("first")).await;
        let _ = mock.complete(request("second")).await;

        let seen = mock.requests().await;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].user_message, "second");
        assert_eq!(mock.call_count().await, 2);
    }
}
