// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound transport trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::RubyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, MessageRef, ReplyOptions};

/// Delivers bot output to the messaging platform.
///
/// Inbound updates are converted to [`crate::types::InboundEvent`] by the
/// transport crate itself; this trait only covers the outbound side the
/// engine needs.
#[async_trait]
pub trait Transport: PluginAdapter {
    /// Sends a new message to a chat.
    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<MessageRef, RubyError>;

    /// Replaces the text and markup of a previously sent message.
    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<(), RubyError>;

    /// Acknowledges a button press so the client stops its loading indicator.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), RubyError>;
}
