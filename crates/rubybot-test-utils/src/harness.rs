// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestHarness` assembles a complete [`Dispatcher`] with a mock completion
//! service, a mock transport, and a temp SQLite database (or any other
//! [`Stores`]). Its helpers build inbound events the way the Telegram layer
//! does, so tests read like a chat transcript.

use std::sync::Arc;
use std::time::Duration;

use rubybot_config::model::StorageConfig;
use rubybot_core::RubyError;
use rubybot_core::types::{ChatId, InboundEvent, MessageRef, UserProfile, UserSnapshot};
use rubybot_engine::{AdminAllowlist, Dispatcher, GenerationSettings, ResponseGenerator, Stores};
use rubybot_storage::SqliteStorage;

use crate::mock_channel::MockTransport;
use crate::mock_provider::MockCompletion;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    completion: Option<MockCompletion>,
    admins: Vec<i64>,
    stores: Option<Stores>,
    timeout: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            completion: None,
            admins: Vec::new(),
            stores: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Queue successful completion replies.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.completion = Some(MockCompletion::with_replies(replies));
        self
    }

    /// Use a preconfigured completion mock.
    pub fn with_completion(mut self, completion: MockCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Allow these user ids to run admin commands.
    pub fn with_admins(mut self, admins: Vec<i64>) -> Self {
        self.admins = admins;
        self
    }

    /// Replace the SQLite stores, e.g. with a [`MemoryStore`](crate::MemoryStore).
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Bound on each completion call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the test harness, creating a fresh temp database.
    pub async fn build(self) -> Result<TestHarness, RubyError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RubyError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        }));
        storage.initialize().await?;

        let stores = self
            .stores
            .unwrap_or_else(|| Stores::from_single(storage.clone()));
        let completion = Arc::new(self.completion.unwrap_or_default());
        let transport = Arc::new(MockTransport::new());

        let settings = GenerationSettings {
            timeout: self.timeout,
            ..GenerationSettings::default()
        };
        let responder = ResponseGenerator::new(completion.clone(), settings);
        let dispatcher = Dispatcher::new(
            stores.clone(),
            transport.clone(),
            responder,
            Arc::new(AdminAllowlist::from_ids(self.admins)),
        );

        Ok(TestHarness {
            dispatcher,
            completion,
            transport,
            stores,
            storage,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    pub dispatcher: Dispatcher,
    pub completion: Arc<MockCompletion>,
    pub transport: Arc<MockTransport>,
    /// The stores the dispatcher writes to.
    pub stores: Stores,
    /// SQLite storage (temp DB, cleaned up on drop). Unused by the
    /// dispatcher when the stores were replaced.
    pub storage: Arc<SqliteStorage>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings.
    pub async fn new() -> Result<Self, RubyError> {
        Self::builder().build().await
    }

    /// Profile used for every event from `user_id`.
    pub fn profile(user_id: i64) -> UserProfile {
        UserProfile {
            telegram_id: user_id,
            username: Some(format!("user{user_id}")),
            first_name: Some("Test".to_string()),
            last_name: None,
        }
    }

    /// Sends `/start` from `user_id`.
    pub async fn start(&self, user_id: i64) -> Result<(), RubyError> {
        self.command(user_id, "start", "").await
    }

    /// Sends `/<name> <args>` from `user_id` in their private chat.
    pub async fn command(&self, user_id: i64, name: &str, args: &str) -> Result<(), RubyError> {
        self.dispatcher
            .handle(InboundEvent::Command {
                from: Self::profile(user_id),
                chat_id: ChatId(user_id),
                name: name.to_string(),
                args: args.split_whitespace().map(str::to_string).collect(),
                raw_args: args.trim().to_string(),
            })
            .await
    }

    /// Sends a plain text message from `user_id`.
    pub async fn say(&self, user_id: i64, text: &str) -> Result<(), RubyError> {
        self.dispatcher
            .handle(InboundEvent::Text {
                from: Self::profile(user_id),
                chat_id: ChatId(user_id),
                text: text.to_string(),
            })
            .await
    }

    /// Presses a button with `data` on the last message sent to `user_id`.
    pub async fn click(&self, user_id: i64, data: &str) -> Result<(), RubyError> {
        let message = self
            .transport
            .last_sent_to(user_id)
            .await
            .map(|sent| sent.message)
            .unwrap_or(MessageRef {
                chat_id: ChatId(user_id),
                message_id: 0,
            });
        self.press(user_id, Some(data), Some(message)).await
    }

    /// Presses a button with full control over the event fields.
    pub async fn press(
        &self,
        user_id: i64,
        data: Option<&str>,
        message: Option<MessageRef>,
    ) -> Result<(), RubyError> {
        self.dispatcher
            .handle(InboundEvent::Callback {
                from: Self::profile(user_id),
                callback_id: format!("cb-{user_id}"),
                data: data.map(str::to_string),
                message,
            })
            .await
    }

    /// The stored snapshot for `user_id`.
    pub async fn user(&self, user_id: i64) -> Option<UserSnapshot> {
        self.stores.users.get_user(user_id).await.ok().flatten()
    }

    /// A counter's current value, 0 when absent.
    pub async fn counter(&self, metric: &str) -> i64 {
        self.stores
            .stats
            .get_all()
            .await
            .ok()
            .and_then(|all| all.get(metric).copied())
            .unwrap_or(0)
    }

    /// Text of the last message sent to `user_id`.
    pub async fn last_reply(&self, user_id: i64) -> Option<String> {
        self.transport
            .last_sent_to(user_id)
            .await
            .map(|sent| sent.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::new().await.unwrap();
        assert_eq!(harness.transport.sent_count().await, 0);
        assert!(harness.user(1).await.is_none());
    }

    #[tokio::test]
    async fn start_registers_user() {
        let harness = TestHarness::new().await.unwrap();
        harness.start(42).await.unwrap();

        let user = harness.user(42).await.unwrap();
        assert_eq!(user.exchange_count, 1);
        assert_eq!(user.username.as_deref(), Some("user42"));
        assert_eq!(harness.transport.sent_to(42).await.len(), 1);
    }

    #[tokio::test]
    async fn say_uses_queued_reply() {
        let harness = TestHarness::builder()
            .with_replies(vec!["  Tell me more!  ".into()])
            .build()
            .await
            .unwrap();
        harness.start(1).await.unwrap();
        harness.say(1, "I write Rust").await.unwrap();

        assert_eq!(harness.last_reply(1).await.as_deref(), Some("Tell me more!"));
        assert_eq!(harness.completion.call_count().await, 1);
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_harness() {
        let a = TestHarness::new().await.unwrap();
        let b = TestHarness::new().await.unwrap();
        a.start(7).await.unwrap();
        assert!(a.user(7).await.is_some());
        assert!(b.user(7).await.is_none());
    }
}
