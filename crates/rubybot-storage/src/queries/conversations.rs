// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only conversation history.

use std::str::FromStr;

use rubybot_core::RubyError;
use rubybot_core::types::{ConversationTurn, MessageRole, now_timestamp};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Append one turn to a user's history.
pub async fn append_turn(
    db: &Database,
    telegram_id: i64,
    role: MessageRole,
    content: &str,
    ai_response: bool,
) -> Result<(), RubyError> {
    let role = role.to_string();
    let content = content.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_history (telegram_id, message_type, content, ai_response, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![telegram_id, role, content, ai_response, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The most recent `limit` turns for a user, oldest first.
pub async fn recent_turns(
    db: &Database,
    telegram_id: i64,
    limit: usize,
) -> Result<Vec<ConversationTurn>, RubyError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT telegram_id, message_type, content, ai_response, created_at
                 FROM (
                     SELECT id, telegram_id, message_type, content, ai_response, created_at
                     FROM conversation_history
                     WHERE telegram_id = ?1
                     ORDER BY id DESC
                     LIMIT ?2
                 )
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![telegram_id, limit], |row| {
                let role: String = row.get(1)?;
                let message_type = MessageRole::from_str(&role).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(ConversationTurn {
                    telegram_id: row.get(0)?,
                    message_type,
                    content: row.get(2)?,
                    ai_response: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
