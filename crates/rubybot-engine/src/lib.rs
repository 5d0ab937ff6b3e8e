// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for Ruby, the TopV1 brand ambassador bot.
//!
//! The [`Dispatcher`] is the single entry point for inbound events. It hands
//! `/start`, free text, and inline-button presses to the
//! [`ConversationEngine`], and admin commands to the [`AdminHandler`] once the
//! [`AdminPolicy`] allows them. Replies come from the [`ResponseGenerator`],
//! which falls back to fixed texts whenever the completion service fails.

pub mod admin;
pub mod callback;
pub mod dispatch;
pub mod engine;
pub mod policy;
pub mod responder;
pub mod shutdown;
pub mod stores;
pub mod templates;

pub use admin::{AdminAllowlist, AdminCommand, AdminHandler, AdminPolicy, BroadcastReport};
pub use callback::{CallbackAction, CallbackRoute, CallbackView};
pub use dispatch::Dispatcher;
pub use engine::ConversationEngine;
pub use policy::{CTA_THRESHOLD, TurnOutcome, turn_outcome};
pub use responder::{GenerationSettings, ResponseGenerator};
pub use stores::{Stores, counters};
