// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram updates into transport-neutral events.
//!
//! Text starting with `/` becomes a [`InboundEvent::Command`]; any other text
//! becomes [`InboundEvent::Text`]. Button presses become
//! [`InboundEvent::Callback`]. Everything else (media, edits, channel posts,
//! messages without a sender) is ignored.

use rubybot_core::types::{ChatId, InboundEvent, MessageRef, UserProfile};
use teloxide::types::{CallbackQuery, Message, Update, UpdateKind, User};
use tracing::{debug, warn};

/// A parsed `/command` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercase name without the slash or `@botname` suffix.
    pub name: String,
    pub args: Vec<String>,
    /// Everything after the command token, trimmed.
    pub raw_args: String,
}

/// Parses `text` as a command. Returns `None` unless it starts with `/`.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let body = text.strip_prefix('/')?;
    let token_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let (token, rest) = body.split_at(token_end);
    let name = token.split('@').next().unwrap_or_default().to_lowercase();

    Some(ParsedCommand {
        name,
        args: rest.split_whitespace().map(str::to_string).collect(),
        raw_args: rest.trim().to_string(),
    })
}

/// Captures the profile fields of a Telegram user.
pub fn to_profile(user: &User) -> Option<UserProfile> {
    let telegram_id = i64::try_from(user.id.0).ok()?;
    Some(UserProfile {
        telegram_id,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
        last_name: user.last_name.clone(),
    })
}

/// Converts a message into an event, if it is one the bot handles.
pub fn message_to_event(msg: &Message) -> Option<InboundEvent> {
    let Some(from) = msg.from.as_ref().and_then(to_profile) else {
        debug!(chat_id = msg.chat.id.0, "ignoring message without sender");
        return None;
    };
    let Some(text) = msg.text() else {
        debug!(msg_id = msg.id.0, "ignoring non-text message");
        return None;
    };
    let chat_id = ChatId(msg.chat.id.0);

    Some(match parse_command(text) {
        Some(command) => InboundEvent::Command {
            from,
            chat_id,
            name: command.name,
            args: command.args,
            raw_args: command.raw_args,
        },
        None => InboundEvent::Text {
            from,
            chat_id,
            text: text.to_string(),
        },
    })
}

/// Converts a button press into an event.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let from = to_profile(&query.from)?;
    let message = query.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat().id.0),
        message_id: m.id().0,
    });

    Some(InboundEvent::Callback {
        from,
        callback_id: query.id.0.clone(),
        data: query.data.clone(),
        message,
    })
}

/// Converts any update into an event, if it is one the bot handles.
pub fn update_to_event(update: &Update) -> Option<InboundEvent> {
    match &update.kind {
        UpdateKind::Message(msg) => message_to_event(msg),
        UpdateKind::CallbackQuery(query) => callback_to_event(query),
        UpdateKind::Error(raw) => {
            warn!(update_id = update.id.0, payload = %raw, "update kind not understood by teloxide");
            None
        }
        _ => {
            debug!(update_id = update.id.0, "ignoring unsupported update kind");
            None
        }
    }
}
