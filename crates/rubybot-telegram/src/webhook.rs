// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook delivery into the event dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use rubybot_core::error::RubyError;
use rubybot_engine::Dispatcher as EventDispatcher;
use rubybot_gateway::WebhookHandler;
use tracing::debug;

use crate::polling::{dispatch_update, parse_update};

/// Feeds webhook payloads through the same path as long polling.
#[derive(Clone)]
pub struct TelegramWebhook {
    dispatcher: Arc<EventDispatcher>,
}

impl TelegramWebhook {
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl WebhookHandler for TelegramWebhook {
    async fn handle_update(&self, body: &[u8]) -> Result<(), RubyError> {
        let update = parse_update(body)?;
        debug!(update_id = update.id.0, "webhook update received");
        dispatch_update(&self.dispatcher, &update).await
    }
}
