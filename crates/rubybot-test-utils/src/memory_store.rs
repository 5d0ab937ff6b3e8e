// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store with failure injection.
//!
//! `MemoryStore` implements every store trait over plain collections. Reads,
//! writes, and user creation can each be switched to fail so tests can
//! exercise the critical and best-effort paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rubybot_core::RubyError;
use rubybot_core::traits::adapter::PluginAdapter;
use rubybot_core::traits::storage::{AdminLog, ConversationLog, StatsStore, UserStore};
use rubybot_core::types::{
    AdapterType, AdminAction, ConversationState, ConversationTurn, HealthStatus, MessageRole,
    UserProfile, UserSnapshot, format_timestamp, now_timestamp,
};

#[derive(Default)]
struct Inner {
    users: Vec<UserSnapshot>,
    counters: BTreeMap<String, i64>,
    turns: Vec<ConversationTurn>,
    actions: Vec<AdminAction>,
}

/// An in-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_create: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read (`get_user`, `get_all`, `count_active_since`, `list_user_ids`) fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write except user creation fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `create_user` fail.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the conversation log for one user, oldest first.
    pub async fn turns_for(&self, telegram_id: i64) -> Vec<ConversationTurn> {
        self.inner
            .lock()
            .await
            .turns
            .iter()
            .filter(|t| t.telegram_id == telegram_id)
            .cloned()
            .collect()
    }

    /// Snapshot of the admin action log, oldest first.
    pub async fn actions(&self) -> Vec<AdminAction> {
        self.inner.lock().await.actions.clone()
    }

    pub async fn counter(&self, metric: &str) -> i64 {
        self.inner
            .lock()
            .await
            .counters
            .get(metric)
            .copied()
            .unwrap_or(0)
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    fn read_guard(&self) -> Result<(), RubyError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RubyError::storage("memory store read failure"));
        }
        Ok(())
    }

    fn write_guard(&self) -> Result<(), RubyError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RubyError::storage("memory store write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, telegram_id: i64) -> Result<Option<UserSnapshot>, RubyError> {
        self.read_guard()?;
        Ok(self
            .inner
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.telegram_id == telegram_id)
            .cloned())
    }

    async fn create_user(&self, profile: &UserProfile) -> Result<UserSnapshot, RubyError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RubyError::storage("memory store create failure"));
        }
        let now = now_timestamp();
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner
            .users
            .iter_mut()
            .find(|u| u.telegram_id == profile.telegram_id)
        {
            user.username = profile.username.clone();
            user.first_name = profile.first_name.clone();
            user.last_name = profile.last_name.clone();
            user.updated_at = now;
            return Ok(user.clone());
        }

        let user = UserSnapshot {
            telegram_id: profile.telegram_id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            conversation_state: ConversationState::Initial,
            exchange_count: 0,
            joined_community: false,
            last_interaction: None,
            created_at: now.clone(),
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_state(
        &self,
        telegram_id: i64,
        state: &ConversationState,
        exchange_count: u32,
    ) -> Result<(), RubyError> {
        self.write_guard()?;
        let now = now_timestamp();
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner.users.iter_mut().find(|u| u.telegram_id == telegram_id) {
            user.conversation_state = state.clone();
            user.exchange_count = exchange_count;
            user.last_interaction = Some(now.clone());
            user.updated_at = now;
        }
        Ok(())
    }

    async fn set_joined_community(
        &self,
        telegram_id: i64,
        joined: bool,
    ) -> Result<(), RubyError> {
        self.write_guard()?;
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner.users.iter_mut().find(|u| u.telegram_id == telegram_id) {
            user.joined_community = joined;
            user.updated_at = now_timestamp();
        }
        Ok(())
    }

    async fn reset_user(&self, telegram_id: i64) -> Result<bool, RubyError> {
        self.write_guard()?;
        let mut inner = self.inner.lock().await;
        match inner.users.iter_mut().find(|u| u.telegram_id == telegram_id) {
            Some(user) => {
                user.conversation_state = ConversationState::Initial;
                user.exchange_count = 0;
                user.updated_at = now_timestamp();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_user_ids(&self) -> Result<Vec<i64>, RubyError> {
        self.read_guard()?;
        Ok(self
            .inner
            .lock()
            .await
            .users
            .iter()
            .map(|u| u.telegram_id)
            .collect())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn increment(&self, metric: &str, by: i64) -> Result<(), RubyError> {
        self.write_guard()?;
        *self
            .inner
            .lock()
            .await
            .counters
            .entry(metric.to_string())
            .or_insert(0) += by;
        Ok(())
    }

    async fn get_all(&self) -> Result<BTreeMap<String, i64>, RubyError> {
        self.read_guard()?;
        Ok(self.inner.lock().await.counters.clone())
    }

    async fn count_active_since(&self, window: Duration) -> Result<u64, RubyError> {
        self.read_guard()?;
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| chrono::Utc::now().checked_sub_signed(w))
            .map(format_timestamp)
            .unwrap_or_default();
        let count = self
            .inner
            .lock()
            .await
            .users
            .iter()
            .filter(|u| {
                u.last_interaction
                    .as_deref()
                    .is_some_and(|at| at >= cutoff.as_str())
            })
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl ConversationLog for MemoryStore {
    async fn append(
        &self,
        telegram_id: i64,
        role: MessageRole,
        content: &str,
        ai_response: bool,
    ) -> Result<(), RubyError> {
        self.write_guard()?;
        self.inner.lock().await.turns.push(ConversationTurn {
            telegram_id,
            message_type: role,
            content: content.to_string(),
            ai_response,
            created_at: now_timestamp(),
        });
        Ok(())
    }
}

#[async_trait]
impl AdminLog for MemoryStore {
    async fn record(&self, action: &AdminAction) -> Result<(), RubyError> {
        self.write_guard()?;
        self.inner.lock().await.actions.push(action.clone());
        Ok(())
    }
}
