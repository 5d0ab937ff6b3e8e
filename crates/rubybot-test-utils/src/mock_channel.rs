// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements `Transport` and captures every reply, edit,
//! and callback answer for assertion in tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rubybot_core::RubyError;
use rubybot_core::traits::adapter::PluginAdapter;
use rubybot_core::traits::channel::Transport;
use rubybot_core::types::{AdapterType, ChatId, HealthStatus, MessageRef, ReplyOptions};

/// A message sent through [`Transport::reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message: MessageRef,
    pub text: String,
    pub options: ReplyOptions,
}

/// An edit made through [`Transport::edit_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    pub message: MessageRef,
    pub text: String,
    pub options: ReplyOptions,
}

/// A mock transport.
///
/// Message ids are assigned sequentially from 1. Delivery to chats marked
/// with [`MockTransport::fail_chat`] fails, as does everything while
/// [`MockTransport::set_failing`] is on.
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    edits: Arc<Mutex<Vec<EditedMessage>>>,
    answered: Arc<Mutex<Vec<String>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    failing: AtomicBool,
    next_id: AtomicI32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            answered: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(HashSet::new())),
            failing: AtomicBool::new(false),
            next_id: AtomicI32::new(1),
        }
    }

    /// Make every delivery to `chat_id` fail.
    pub async fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().await.insert(chat_id);
    }

    /// Toggle failure of every operation.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every message sent, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to one chat, in order.
    pub async fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.message.chat_id == ChatId(chat_id))
            .cloned()
            .collect()
    }

    /// The most recent message sent to `chat_id`.
    pub async fn last_sent_to(&self, chat_id: i64) -> Option<SentMessage> {
        self.sent_to(chat_id).await.pop()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().await.clone()
    }

    /// Callback ids answered, in order.
    pub async fn answered(&self) -> Vec<String> {
        self.answered.lock().await.clone()
    }

    /// Forget everything captured so far.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
        self.edits.lock().await.clear();
        self.answered.lock().await.clear();
    }

    async fn check(&self, chat_id: ChatId) -> Result<(), RubyError> {
        if self.failing.load(Ordering::SeqCst)
            || self.failing_chats.lock().await.contains(&chat_id.0)
        {
            return Err(RubyError::channel(format!(
                "mock delivery to chat {} failed",
                chat_id.0
            )));
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        Ok(())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<MessageRef, RubyError> {
        self.check(chat_id).await?;
        let message = MessageRef {
            chat_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        self.sent.lock().await.push(SentMessage {
            message,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<(), RubyError> {
        self.check(message.chat_id).await?;
        self.edits.lock().await.push(EditedMessage {
            message,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), RubyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RubyError::channel("mock answer failed"));
        }
        self.answered.lock().await.push(callback_id.to_string());
        Ok(())
    }
}
