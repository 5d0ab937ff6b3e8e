// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator commands: `/stats`, `/reset`, `/broadcast`.
//!
//! Authorization is a separate [`AdminPolicy`] so the handler itself never
//! sees the allowlist.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rubybot_config::model::TelegramConfig;
use rubybot_core::RubyError;
use rubybot_core::traits::Transport;
use rubybot_core::types::{AdminAction, ChatId, ReplyOptions};
use tracing::{debug, info, warn};

use crate::stores::Stores;
use crate::templates;

/// Window for the "active users" statistic.
pub const ACTIVE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Decides who may run admin commands.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, user_id: i64) -> bool;
}

/// A fixed set of admin user ids.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowlist {
    ids: HashSet<i64>,
}

impl AdminAllowlist {
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn from_config(config: &TelegramConfig) -> Self {
        Self::from_ids(config.admin_user_ids.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl AdminPolicy for AdminAllowlist {
    fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }
}

/// A parsed admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Stats,
    /// `None` when the target id is missing or not a valid user id.
    Reset(Option<i64>),
    /// Empty when no message was given.
    Broadcast(String),
}

impl AdminCommand {
    /// Parses a command by name. Returns `None` for non-admin commands.
    pub fn parse(name: &str, args: &[String], raw_args: &str) -> Option<Self> {
        match name {
            "stats" => Some(AdminCommand::Stats),
            "reset" => Some(AdminCommand::Reset(
                args.first().and_then(|arg| parse_user_id(arg)),
            )),
            "broadcast" => Some(AdminCommand::Broadcast(raw_args.trim().to_string())),
            _ => None,
        }
    }
}

/// Zero is never a valid platform id.
fn parse_user_id(arg: &str) -> Option<i64> {
    arg.parse::<i64>().ok().filter(|id| *id != 0)
}

/// Tally of a finished broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Executes admin commands for an already-authorized admin.
pub struct AdminHandler {
    stores: Stores,
    transport: Arc<dyn Transport + Send + Sync>,
}

impl AdminHandler {
    pub fn new(stores: Stores, transport: Arc<dyn Transport + Send + Sync>) -> Self {
        Self { stores, transport }
    }

    pub async fn execute(
        &self,
        admin_id: i64,
        chat_id: ChatId,
        command: AdminCommand,
    ) -> Result<(), RubyError> {
        match command {
            AdminCommand::Stats => self.stats(admin_id, chat_id).await,
            AdminCommand::Reset(target) => self.reset(admin_id, chat_id, target).await,
            AdminCommand::Broadcast(message) => {
                self.broadcast(admin_id, chat_id, &message).await.map(|_| ())
            }
        }
    }

    async fn stats(&self, admin_id: i64, chat_id: ChatId) -> Result<(), RubyError> {
        let snapshot = match self.stores.stats.get_all().await {
            Ok(counters) => self
                .stores
                .stats
                .count_active_since(ACTIVE_WINDOW)
                .await
                .map(|active| (counters, active)),
            Err(e) => Err(e),
        };

        match snapshot {
            Ok((counters, active)) => {
                let text = templates::stats_text(&counters, active);
                self.transport
                    .reply(chat_id, &text, &ReplyOptions::markdown())
                    .await?;
                self.audit(AdminAction::new(admin_id, "stats_requested")).await;
            }
            Err(e) => {
                warn!(admin_id, error = %e, "stats unavailable");
                self.transport
                    .reply(chat_id, templates::STATS_ERROR, &ReplyOptions::plain())
                    .await?;
            }
        }
        Ok(())
    }

    async fn reset(
        &self,
        admin_id: i64,
        chat_id: ChatId,
        target: Option<i64>,
    ) -> Result<(), RubyError> {
        let Some(target) = target else {
            self.transport
                .reply(chat_id, templates::RESET_USAGE, &ReplyOptions::plain())
                .await?;
            return Ok(());
        };

        match self.stores.users.reset_user(target).await {
            Ok(true) => info!(admin_id, target, "user reset"),
            Ok(false) => warn!(admin_id, target, "reset requested for unknown user"),
            Err(e) => warn!(admin_id, target, error = %e, "user reset failed"),
        }

        self.transport
            .reply(chat_id, &templates::reset_done(target), &ReplyOptions::plain())
            .await?;
        self.audit(AdminAction::new(admin_id, "user_reset").with_target(target))
            .await;
        Ok(())
    }

    /// Sends `message` to every known user, continuing past failures.
    pub async fn broadcast(
        &self,
        admin_id: i64,
        chat_id: ChatId,
        message: &str,
    ) -> Result<BroadcastReport, RubyError> {
        if message.is_empty() {
            self.transport
                .reply(chat_id, templates::BROADCAST_USAGE, &ReplyOptions::plain())
                .await?;
            return Ok(BroadcastReport::default());
        }

        let recipients = self.stores.users.list_user_ids().await.unwrap_or_else(|e| {
            warn!(admin_id, error = %e, "could not list users for broadcast");
            Vec::new()
        });

        self.transport
            .reply(
                chat_id,
                &templates::broadcast_started(recipients.len()),
                &ReplyOptions::plain(),
            )
            .await?;

        let text = templates::broadcast_message(message);
        let options = ReplyOptions::markdown();
        let mut report = BroadcastReport::default();
        for user_id in recipients {
            match self.transport.reply(ChatId(user_id), &text, &options).await {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    debug!(user_id, error = %e, "broadcast delivery failed");
                }
            }
        }
        info!(admin_id, sent = report.sent, failed = report.failed, "broadcast finished");

        self.transport
            .reply(
                chat_id,
                &templates::broadcast_summary(report.sent, report.failed),
                &ReplyOptions::plain(),
            )
            .await?;
        self.audit(
            AdminAction::new(admin_id, "broadcast_sent").with_details(
                templates::broadcast_details(message, report.sent, report.failed),
            ),
        )
        .await;
        Ok(report)
    }

    async fn audit(&self, action: AdminAction) {
        if let Err(e) = self.stores.admin_log.record(&action).await {
            warn!(
                admin_id = action.admin_id,
                action = %action.action,
                error = %e,
                "admin action not recorded"
            );
        }
    }
}
