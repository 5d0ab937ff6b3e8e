// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for rubybot.
//!
//! Implements [`Transport`] for the Telegram Bot API via teloxide, converts
//! incoming updates into [`InboundEvent`](rubybot_core::types::InboundEvent)s,
//! and feeds them to the dispatcher from long polling or the webhook gateway.

pub mod handler;
pub mod polling;
pub mod webhook;

use async_trait::async_trait;
use rubybot_config::model::TelegramConfig;
use rubybot_core::error::RubyError;
use rubybot_core::traits::{PluginAdapter, Transport};
use rubybot_core::types::{
    AdapterType, ChatId, HealthStatus, InlineMenu, MessageRef, ReplyOptions, TextFormat,
};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup,
    MessageId, ParseMode, Recipient,
};
use tracing::{debug, warn};

pub use polling::{dispatch_update, parse_update, run_polling};
pub use webhook::TelegramWebhook;

/// Telegram transport implementing [`Transport`].
#[derive(Clone)]
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Creates a new Telegram transport.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, RubyError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            RubyError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;

        if token.trim().is_empty() {
            return Err(RubyError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Maps a transport-neutral format to a Telegram parse mode.
#[allow(deprecated)]
pub fn parse_mode(format: TextFormat) -> Option<ParseMode> {
    match format {
        TextFormat::Plain => None,
        TextFormat::Markdown => Some(ParseMode::Markdown),
    }
}

/// Builds an inline keyboard with one callback button per menu entry.
pub fn keyboard(menu: &InlineMenu) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = menu
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    InlineKeyboardButton::new(
                        button.label.clone(),
                        InlineKeyboardButtonKind::CallbackData(button.action_id.clone()),
                    )
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

fn callback_query_id(id: &str) -> CallbackQueryId {
    CallbackQueryId(id.to_string())
}

/// Telegram reports a no-op edit as an error; repeated clicks produce them.
fn is_not_modified(err: &str) -> bool {
    err.contains("message is not modified")
}

fn is_entity_parse_error(err: &str) -> bool {
    err.contains("can't parse entities")
}

fn channel_error(action: &str, e: teloxide::RequestError) -> RubyError {
    RubyError::Channel {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

impl TelegramChannel {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        mode: Option<ParseMode>,
        menu: Option<&InlineMenu>,
    ) -> Result<teloxide::types::Message, teloxide::RequestError> {
        let mut request = self
            .bot
            .send_message(Recipient::Id(teloxide::types::ChatId(chat_id.0)), text);
        if let Some(mode) = mode {
            request = request.parse_mode(mode);
        }
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }
        request.await
    }

    async fn edit(
        &self,
        message: MessageRef,
        text: &str,
        mode: Option<ParseMode>,
        menu: Option<&InlineMenu>,
    ) -> Result<(), teloxide::RequestError> {
        let mut request = self.bot.edit_message_text(
            teloxide::types::ChatId(message.chat_id.0),
            MessageId(message.message_id),
            text,
        );
        if let Some(mode) = mode {
            request = request.parse_mode(mode);
        }
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }
        request.await.map(|_| ())
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        debug!("Telegram transport shutting down");
        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramChannel {
    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<MessageRef, RubyError> {
        let mode = parse_mode(options.format);
        let menu = options.menu.as_ref();

        let sent = match self.send(chat_id, text, mode.clone(), menu).await {
            Ok(sent) => sent,
            Err(e) if mode.is_some() && is_entity_parse_error(&e.to_string()) => {
                warn!(chat_id = chat_id.0, error = %e, "Markdown send failed, sending as plain text");
                self.send(chat_id, text, None, menu)
                    .await
                    .map_err(|e| channel_error("send message", e))?
            }
            Err(e) => return Err(channel_error("send message", e)),
        };

        Ok(MessageRef {
            chat_id,
            message_id: sent.id.0,
        })
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        options: &ReplyOptions,
    ) -> Result<(), RubyError> {
        let mode = parse_mode(options.format);
        let menu = options.menu.as_ref();

        match self.edit(message, text, mode.clone(), menu).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let err_str = e.to_string();
                if is_not_modified(&err_str) {
                    debug!(
                        chat_id = message.chat_id.0,
                        message_id = message.message_id,
                        "edit left message unchanged"
                    );
                    Ok(())
                } else if mode.is_some() && is_entity_parse_error(&err_str) {
                    warn!(error = %e, "Markdown edit failed, retrying as plain text");
                    self.edit(message, text, None, menu)
                        .await
                        .map_err(|e| channel_error("edit message", e))
                } else {
                    Err(channel_error("edit message", e))
                }
            }
        }
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), RubyError> {
        self.bot
            .answer_callback_query(callback_query_id(callback_id))
            .await
            .map_err(|e| channel_error("answer callback query", e))?;
        Ok(())
    }
}
