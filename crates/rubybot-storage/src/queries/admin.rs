// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin audit trail.

use rubybot_core::RubyError;
use rubybot_core::types::AdminAction;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

pub async fn record_action(db: &Database, action: &AdminAction) -> Result<(), RubyError> {
    let action = action.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO admin_actions (admin_id, action, target_user_id, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    action.admin_id,
                    action.action,
                    action.target_user_id,
                    action.details,
                    action.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent actions first.
pub async fn list_actions(db: &Database, limit: usize) -> Result<Vec<AdminAction>, RubyError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT admin_id, action, target_user_id, details, created_at
                 FROM admin_actions ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(AdminAction {
                    admin_id: row.get(0)?,
                    action: row.get(1)?,
                    target_user_id: row.get(2)?,
                    details: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_db;

    #[tokio::test]
    async fn actions_are_listed_newest_first() {
        let (db, _dir) = temp_db().await;
        record_action(&db, &AdminAction::new(1, "stats_requested"))
            .await
            .unwrap();
        record_action(&db, &AdminAction::new(1, "user_reset").with_target(99))
            .await
            .unwrap();

        let actions = list_actions(&db, 10).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, "user_reset");
        assert_eq!(actions[0].target_user_id, Some(99));
        assert_eq!(actions[1].action, "stats_requested");
        assert!(actions[1].details.is_none());
        db.close().await.unwrap();
    }
}
