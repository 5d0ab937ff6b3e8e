// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the rubybot brand-ambassador bot.
//!
//! This crate provides the collaborator trait definitions, error types, and
//! domain types used throughout the rubybot workspace. Storage, completion,
//! and transport adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RubyError;
pub use types::{
    AdapterType, AdminAction, ChatId, CompletionRequest, ConversationState, ConversationTurn,
    HealthStatus, InboundEvent, InlineMenu, MenuButton, MessageRef, MessageRole, ReplyOptions,
    TextFormat, UserProfile, UserSnapshot,
};

pub use traits::{
    AdminLog, CompletionService, ConversationLog, PluginAdapter, StatsStore, Transport,
    UserStore,
};
