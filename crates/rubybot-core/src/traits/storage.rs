// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for users, counters, and append-only logs.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RubyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AdminAction, ConversationState, MessageRole, UserProfile, UserSnapshot};

/// Per-user conversation records.
#[async_trait]
pub trait UserStore: PluginAdapter {
    /// Looks up a user by platform id.
    async fn get_user(&self, telegram_id: i64) -> Result<Option<UserSnapshot>, RubyError>;

    /// Creates a user in state `initial` with zero exchanges.
    ///
    /// If the user already exists only the profile fields are refreshed and
    /// the stored record is returned unchanged otherwise.
    async fn create_user(&self, profile: &UserProfile) -> Result<UserSnapshot, RubyError>;

    /// Sets state and exchange count, stamping `last_interaction`.
    async fn update_state(
        &self,
        telegram_id: i64,
        state: &ConversationState,
        exchange_count: u32,
    ) -> Result<(), RubyError>;

    async fn set_joined_community(&self, telegram_id: i64, joined: bool)
    -> Result<(), RubyError>;

    /// Returns the user to `initial` with zero exchanges.
    ///
    /// Returns `false` when no such user exists.
    async fn reset_user(&self, telegram_id: i64) -> Result<bool, RubyError>;

    /// Platform ids of every known user.
    async fn list_user_ids(&self) -> Result<Vec<i64>, RubyError>;
}

/// Named integer counters plus derived figures.
#[async_trait]
pub trait StatsStore: PluginAdapter {
    /// Adds `by` to a counter, creating it if absent.
    async fn increment(&self, metric: &str, by: i64) -> Result<(), RubyError>;

    /// Every counter, keyed by name.
    async fn get_all(&self) -> Result<BTreeMap<String, i64>, RubyError>;

    /// Number of users who interacted within the trailing `window`.
    async fn count_active_since(&self, window: Duration) -> Result<u64, RubyError>;
}

/// Append-only record of every exchanged message.
#[async_trait]
pub trait ConversationLog: PluginAdapter {
    async fn append(
        &self,
        telegram_id: i64,
        role: MessageRole,
        content: &str,
        ai_response: bool,
    ) -> Result<(), RubyError>;
}

/// Append-only audit log of administrative actions.
#[async_trait]
pub trait AdminLog: PluginAdapter {
    async fn record(&self, action: &AdminAction) -> Result<(), RubyError>;
}
