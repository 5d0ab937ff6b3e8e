// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the rubybot store traits.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use rubybot_config::model::StorageConfig;
use rubybot_core::types::{
    AdminAction, ConversationState, ConversationTurn, MessageRole, UserProfile, UserSnapshot,
    format_timestamp,
};
use rubybot_core::{
    AdapterType, AdminLog, ConversationLog, HealthStatus, PluginAdapter, RubyError, StatsStore,
    UserStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`Self::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the database and runs migrations. Fails if called twice.
    pub async fn initialize(&self) -> Result<(), RubyError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| RubyError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, RubyError> {
        self.db
            .get()
            .ok_or_else(|| RubyError::storage("storage not initialized -- call initialize() first"))
    }

    /// The most recent `limit` conversation turns for a user, oldest first.
    pub async fn conversation_history(
        &self,
        telegram_id: i64,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, RubyError> {
        queries::conversations::recent_turns(self.db()?, telegram_id, limit).await
    }

    /// The most recent `limit` admin actions, newest first.
    pub async fn admin_actions(&self, limit: usize) -> Result<Vec<AdminAction>, RubyError> {
        queries::admin::list_actions(self.db()?, limit).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn get_user(&self, telegram_id: i64) -> Result<Option<UserSnapshot>, RubyError> {
        queries::users::get_user(self.db()?, telegram_id).await
    }

    async fn create_user(&self, profile: &UserProfile) -> Result<UserSnapshot, RubyError> {
        queries::users::upsert_user(self.db()?, profile).await
    }

    async fn update_state(
        &self,
        telegram_id: i64,
        state: &ConversationState,
        exchange_count: u32,
    ) -> Result<(), RubyError> {
        queries::users::update_state(self.db()?, telegram_id, state, exchange_count).await
    }

    async fn set_joined_community(
        &self,
        telegram_id: i64,
        joined: bool,
    ) -> Result<(), RubyError> {
        queries::users::set_joined_community(self.db()?, telegram_id, joined).await
    }

    async fn reset_user(&self, telegram_id: i64) -> Result<bool, RubyError> {
        queries::users::reset_user(self.db()?, telegram_id).await
    }

    async fn list_user_ids(&self) -> Result<Vec<i64>, RubyError> {
        queries::users::list_user_ids(self.db()?).await
    }
}

#[async_trait]
impl StatsStore for SqliteStorage {
    async fn increment(&self, metric: &str, by: i64) -> Result<(), RubyError> {
        queries::stats::increment(self.db()?, metric, by).await
    }

    async fn get_all(&self) -> Result<BTreeMap<String, i64>, RubyError> {
        queries::stats::get_all(self.db()?).await
    }

    async fn count_active_since(&self, window: Duration) -> Result<u64, RubyError> {
        // An unrepresentable window counts everyone who ever interacted.
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| chrono::Utc::now().checked_sub_signed(w))
            .map(format_timestamp)
            .unwrap_or_default();
        queries::users::count_active_since(self.db()?, &cutoff).await
    }
}

#[async_trait]
impl ConversationLog for SqliteStorage {
    async fn append(
        &self,
        telegram_id: i64,
        role: MessageRole,
        content: &str,
        ai_response: bool,
    ) -> Result<(), RubyError> {
        queries::conversations::append_turn(self.db()?, telegram_id, role, content, ai_response)
            .await
    }
}

#[async_trait]
impl AdminLog for SqliteStorage {
    async fn record(&self, action: &AdminAction) -> Result<(), RubyError> {
        queries::admin::record_action(self.db()?, action).await
    }
}
