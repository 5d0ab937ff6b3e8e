// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persistence collaborators shared by the engine and the admin handler.

use std::sync::Arc;

use rubybot_core::RubyError;
use rubybot_core::traits::{AdminLog, ConversationLog, StatsStore, UserStore};
use tracing::warn;

/// Counter names in the stats store.
pub mod counters {
    pub const TOTAL_USERS: &str = "total_users";
    pub const CONVERSATIONS_STARTED: &str = "conversations_started";
    pub const COMMUNITY_CONVERSIONS: &str = "community_conversions";
    /// Unix seconds, written once when the schema is created.
    pub const BOT_DEPLOYED_AT: &str = "bot_deployed_at";
}

/// Handles to every store the bot writes to.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore + Send + Sync>,
    pub stats: Arc<dyn StatsStore + Send + Sync>,
    pub log: Arc<dyn ConversationLog + Send + Sync>,
    pub admin_log: Arc<dyn AdminLog + Send + Sync>,
}

impl Stores {
    /// Uses one backend for every store.
    pub fn from_single<S>(store: Arc<S>) -> Self
    where
        S: UserStore + StatsStore + ConversationLog + AdminLog + Send + Sync + 'static,
    {
        Self {
            users: store.clone(),
            stats: store.clone(),
            log: store.clone(),
            admin_log: store,
        }
    }
}

/// Absorbs the failure of a non-critical store write.
pub(crate) fn best_effort(op: &'static str, telegram_id: i64, result: Result<(), RubyError>) {
    if let Err(e) = result {
        warn!(op, telegram_id, error = %e, "best-effort store write failed");
    }
}
