// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user conversation state machine.
//!
//! Each turn reads the user's snapshot once, replies, then writes the new
//! exchange count back. Store writes are tagged at the call site: user
//! creation is critical and propagates, everything else goes through
//! [`best_effort`]. Transport failures always propagate.
//!
//! Two turns for the same user running at once both read the same count and
//! both write `count + 1`, so one increment is lost. Turns are not serialized
//! per user.

use std::sync::Arc;

use rubybot_core::RubyError;
use rubybot_core::traits::Transport;
use rubybot_core::types::{
    ChatId, ConversationState, MessageRef, MessageRole, ReplyOptions, UserProfile, UserSnapshot,
};
use tracing::{debug, info, warn};

use crate::callback::{CallbackAction, CallbackRoute};
use crate::policy::{TurnOutcome, turn_outcome};
use crate::responder::ResponseGenerator;
use crate::stores::{Stores, best_effort, counters};
use crate::templates;

/// Drives `/start`, free-text turns, and inline-button presses.
pub struct ConversationEngine {
    stores: Stores,
    transport: Arc<dyn Transport + Send + Sync>,
    responder: ResponseGenerator,
}

impl ConversationEngine {
    pub fn new(
        stores: Stores,
        transport: Arc<dyn Transport + Send + Sync>,
        responder: ResponseGenerator,
    ) -> Self {
        Self {
            stores,
            transport,
            responder,
        }
    }

    /// A read failure is treated the same as an unknown user.
    async fn lookup(&self, telegram_id: i64) -> Option<UserSnapshot> {
        match self.stores.users.get_user(telegram_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(telegram_id, error = %e, "user lookup failed, treating as unknown");
                None
            }
        }
    }

    /// Handles `/start`: registers the user if needed and sends the welcome.
    pub async fn start(&self, from: &UserProfile, chat_id: ChatId) -> Result<(), RubyError> {
        let id = from.telegram_id;

        if self.lookup(id).await.is_none() {
            self.stores.users.create_user(from).await?;
            info!(telegram_id = id, "new user registered");
            best_effort(
                "increment total_users",
                id,
                self.stores.stats.increment(counters::TOTAL_USERS, 1).await,
            );
        }

        best_effort(
            "log start command",
            id,
            self.stores
                .log
                .append(id, MessageRole::User, "/start", false)
                .await,
        );

        self.transport
            .reply(chat_id, templates::WELCOME, &ReplyOptions::plain())
            .await?;

        best_effort(
            "log welcome",
            id,
            self.stores
                .log
                .append(id, MessageRole::Bot, templates::WELCOME, false)
                .await,
        );
        best_effort(
            "update state",
            id,
            self.stores
                .users
                .update_state(id, &ConversationState::Greeting, 1)
                .await,
        );
        best_effort(
            "increment conversations_started",
            id,
            self.stores
                .stats
                .increment(counters::CONVERSATIONS_STARTED, 1)
                .await,
        );
        Ok(())
    }

    /// Handles a free-text message.
    ///
    /// Returns the outcome sent, or `None` when the user has not started yet.
    pub async fn converse(
        &self,
        from: &UserProfile,
        chat_id: ChatId,
        text: &str,
    ) -> Result<Option<TurnOutcome>, RubyError> {
        let id = from.telegram_id;

        let Some(user) = self.lookup(id).await else {
            self.transport
                .reply(chat_id, templates::START_PROMPT, &ReplyOptions::plain())
                .await?;
            return Ok(None);
        };

        best_effort(
            "log user message",
            id,
            self.stores.log.append(id, MessageRole::User, text, false).await,
        );

        let generated = self.responder.generate(text, &user).await;
        let outcome = turn_outcome(user.exchange_count);

        match outcome {
            TurnOutcome::PlainReply => {
                self.transport
                    .reply(chat_id, &generated, &ReplyOptions::plain())
                    .await?;
                best_effort(
                    "log reply",
                    id,
                    self.stores
                        .log
                        .append(id, MessageRole::Bot, &generated, true)
                        .await,
                );
            }
            TurnOutcome::CallToAction => {
                let message = templates::call_to_action_text(&generated);
                let options = ReplyOptions::plain().with_menu(templates::cta_menu());
                self.transport.reply(chat_id, &message, &options).await?;
                debug!(telegram_id = id, "call-to-action sent");
                best_effort(
                    "log call-to-action",
                    id,
                    self.stores
                        .log
                        .append(
                            id,
                            MessageRole::Bot,
                            &format!("{message}{}", templates::CTA_LOG_SUFFIX),
                            true,
                        )
                        .await,
                );
            }
        }

        best_effort(
            "update state",
            id,
            self.stores
                .users
                .update_state(
                    id,
                    &user.conversation_state,
                    user.exchange_count.saturating_add(1),
                )
                .await,
        );
        Ok(Some(outcome))
    }

    /// Handles an inline-button press.
    pub async fn callback(
        &self,
        from: &UserProfile,
        callback_id: &str,
        data: Option<&str>,
        message: Option<MessageRef>,
    ) -> Result<(), RubyError> {
        let id = from.telegram_id;
        self.transport.answer_callback(callback_id).await?;

        let data = data.unwrap_or_default();
        match CallbackRoute::resolve(data) {
            CallbackRoute::Known(action) => {
                if action == CallbackAction::JoinCommunity {
                    best_effort(
                        "set joined_community",
                        id,
                        self.stores.users.set_joined_community(id, true).await,
                    );
                    best_effort(
                        "increment community_conversions",
                        id,
                        self.stores
                            .stats
                            .increment(counters::COMMUNITY_CONVERSIONS, 1)
                            .await,
                    );
                }

                let view = action.view();
                match message {
                    Some(message) => {
                        let options = ReplyOptions {
                            format: view.format,
                            menu: view.menu,
                        };
                        self.transport
                            .edit_message(message, view.text, &options)
                            .await?;
                    }
                    None => debug!(telegram_id = id, "callback message unavailable, skipping edit"),
                }
            }
            CallbackRoute::Unrecognized(data) => {
                debug!(telegram_id = id, data = %data, "unrecognized callback acknowledged");
            }
        }

        best_effort(
            "log callback",
            id,
            self.stores
                .log
                .append(id, MessageRole::User, &format!("Callback: {data}"), false)
                .await,
        );
        Ok(())
    }
}
