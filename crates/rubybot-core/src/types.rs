// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the rubybot engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
}

// --- Users ---

/// Profile fields captured from the messaging platform on first contact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform user id (unique, stable).
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    /// A profile carrying only the platform id.
    pub fn with_id(telegram_id: i64) -> Self {
        Self {
            telegram_id,
            ..Self::default()
        }
    }
}

/// Stage of a user's conversation.
///
/// Only `initial` and `greeting` are produced by the engine; any other value
/// read back from storage is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConversationState {
    Initial,
    Greeting,
    Other(String),
}

impl ConversationState {
    pub fn as_str(&self) -> &str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::Greeting => "greeting",
            ConversationState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ConversationState {
    fn from(value: &str) -> Self {
        match value {
            "initial" => ConversationState::Initial,
            "greeting" => ConversationState::Greeting,
            other => ConversationState::Other(other.to_string()),
        }
    }
}

impl From<String> for ConversationState {
    fn from(value: String) -> Self {
        ConversationState::from(value.as_str())
    }
}

impl From<ConversationState> for String {
    fn from(value: ConversationState) -> Self {
        value.as_str().to_string()
    }
}

/// A user's persisted conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub conversation_state: ConversationState,
    /// Conversational turns processed since creation or the last reset.
    pub exchange_count: u32,
    pub joined_community: bool,
    pub last_interaction: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// --- Conversation log ---

/// Who authored a logged conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

/// One append-only entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub telegram_id: i64,
    pub message_type: MessageRole,
    pub content: String,
    /// `true` when the bot content came from the completion service.
    pub ai_response: bool,
    pub created_at: String,
}

// --- Admin log ---

/// A record of an administrative command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAction {
    pub admin_id: i64,
    pub action: String,
    pub target_user_id: Option<i64>,
    pub details: Option<String>,
    pub created_at: String,
}

impl AdminAction {
    /// Creates an action stamped with the current time.
    pub fn new(admin_id: i64, action: impl Into<String>) -> Self {
        Self {
            admin_id,
            action: action.into(),
            target_user_id: None,
            details: None,
            created_at: now_timestamp(),
        }
    }

    pub fn with_target(mut self, target_user_id: i64) -> Self {
        self.target_user_id = Some(target_user_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// --- Completion ---

/// A single-shot completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_message: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

// --- Outbound messages ---

/// Identifier of a chat on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Points at a message previously delivered to a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: i32,
}

/// Rich-text mode for outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Legacy Telegram Markdown (`*bold*`, `[label](url)`).
    Markdown,
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    /// Opaque identifier echoed back in the callback.
    pub action_id: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action_id: action_id.into(),
        }
    }
}

/// Ordered rows of inline buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineMenu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl InlineMenu {
    /// A menu with a single row of buttons.
    pub fn single_row(buttons: Vec<MenuButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    /// Iterates over every button's action id, row by row.
    pub fn action_ids(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|b| b.action_id.as_str()))
    }
}

/// Formatting and markup options for an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplyOptions {
    pub format: TextFormat,
    pub menu: Option<InlineMenu>,
}

impl ReplyOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn markdown() -> Self {
        Self {
            format: TextFormat::Markdown,
            menu: None,
        }
    }

    pub fn with_menu(mut self, menu: InlineMenu) -> Self {
        self.menu = Some(menu);
        self
    }
}

// --- Inbound events ---

/// A transport-neutral inbound update.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A `/command` message. `name` is lowercase without the leading slash.
    Command {
        from: UserProfile,
        chat_id: ChatId,
        name: String,
        /// Whitespace-separated arguments.
        args: Vec<String>,
        /// Everything after the command token, trimmed, inner layout intact.
        raw_args: String,
    },
    /// A plain text message.
    Text {
        from: UserProfile,
        chat_id: ChatId,
        text: String,
    },
    /// An inline button press.
    Callback {
        from: UserProfile,
        callback_id: String,
        data: Option<String>,
        /// The message carrying the pressed button, if still accessible.
        message: Option<MessageRef>,
    },
}

impl InboundEvent {
    /// The platform id of the user who triggered the event.
    pub fn sender_id(&self) -> i64 {
        match self {
            InboundEvent::Command { from, .. }
            | InboundEvent::Text { from, .. }
            | InboundEvent::Callback { from, .. } => from.telegram_id,
        }
    }
}

/// Current UTC time in the storage timestamp format.
pub fn now_timestamp() -> String {
    format_timestamp(chrono::Utc::now())
}

/// Formats a point in time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Timestamps in this format sort lexicographically in time order.
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
