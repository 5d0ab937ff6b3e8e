// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes inbound events to the engine or the admin handler.

use std::sync::Arc;

use rubybot_core::RubyError;
use rubybot_core::traits::Transport;
use rubybot_core::types::{InboundEvent, ReplyOptions};
use tracing::{debug, info};

use crate::admin::{AdminCommand, AdminHandler, AdminPolicy};
use crate::engine::ConversationEngine;
use crate::responder::ResponseGenerator;
use crate::stores::Stores;
use crate::templates;

/// Entry point for every inbound event, whichever transport delivered it.
pub struct Dispatcher {
    engine: ConversationEngine,
    admin: AdminHandler,
    policy: Arc<dyn AdminPolicy>,
    transport: Arc<dyn Transport + Send + Sync>,
}

impl Dispatcher {
    pub fn new(
        stores: Stores,
        transport: Arc<dyn Transport + Send + Sync>,
        responder: ResponseGenerator,
        policy: Arc<dyn AdminPolicy>,
    ) -> Self {
        Self {
            engine: ConversationEngine::new(stores.clone(), transport.clone(), responder),
            admin: AdminHandler::new(stores, transport.clone()),
            policy,
            transport,
        }
    }

    /// Handles one event. Errors are returned to the transport layer.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), RubyError> {
        match event {
            InboundEvent::Command {
                from,
                chat_id,
                name,
                args,
                raw_args,
            } => {
                if name == "start" {
                    return self.engine.start(&from, chat_id).await;
                }

                let Some(command) = AdminCommand::parse(&name, &args, &raw_args) else {
                    debug!(telegram_id = from.telegram_id, command = %name, "ignoring unknown command");
                    return Ok(());
                };

                if !self.policy.is_admin(from.telegram_id) {
                    info!(telegram_id = from.telegram_id, command = %name, "admin command refused");
                    self.transport
                        .reply(chat_id, templates::ADMIN_ONLY, &ReplyOptions::plain())
                        .await?;
                    return Ok(());
                }

                self.admin.execute(from.telegram_id, chat_id, command).await
            }
            InboundEvent::Text {
                from,
                chat_id,
                text,
            } => self.engine.converse(&from, chat_id, &text).await.map(|_| ()),
            InboundEvent::Callback {
                from,
                callback_id,
                data,
                message,
            } => {
                self.engine
                    .callback(&from, &callback_id, data.as_deref(), message)
                    .await
            }
        }
    }
}
