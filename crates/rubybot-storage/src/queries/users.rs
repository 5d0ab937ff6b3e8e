// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User record operations.

use rubybot_core::RubyError;
use rubybot_core::types::{ConversationState, UserProfile, UserSnapshot, now_timestamp};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const USER_COLUMNS: &str = "telegram_id, username, first_name, last_name, conversation_state, \
     exchange_count, joined_community, last_interaction, created_at, updated_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserSnapshot> {
    let state: String = row.get(4)?;
    Ok(UserSnapshot {
        telegram_id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        conversation_state: ConversationState::from(state),
        exchange_count: row.get(5)?,
        joined_community: row.get(6)?,
        last_interaction: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Get a user by Telegram id.
pub async fn get_user(db: &Database, telegram_id: i64) -> Result<Option<UserSnapshot>, RubyError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?1"),
                params![telegram_id],
                row_to_user,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a user in state `initial`, or refresh the profile of an existing one.
///
/// Returns the stored record either way.
pub async fn upsert_user(db: &Database, profile: &UserProfile) -> Result<UserSnapshot, RubyError> {
    let profile = profile.clone();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (telegram_id, username, first_name, last_name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(telegram_id) DO UPDATE SET
                     username = excluded.username,
                     first_name = excluded.first_name,
                     last_name = excluded.last_name,
                     updated_at = excluded.updated_at",
                params![
                    profile.telegram_id,
                    profile.username,
                    profile.first_name,
                    profile.last_name,
                    now,
                ],
            )?;
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?1"),
                params![profile.telegram_id],
                row_to_user,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Set state and exchange count, stamping `last_interaction` and `updated_at`.
pub async fn update_state(
    db: &Database,
    telegram_id: i64,
    state: &ConversationState,
    exchange_count: u32,
) -> Result<(), RubyError> {
    let state = state.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users
                 SET conversation_state = ?1, exchange_count = ?2,
                     last_interaction = ?3, updated_at = ?3
                 WHERE telegram_id = ?4",
                params![state, exchange_count, now, telegram_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_joined_community(
    db: &Database,
    telegram_id: i64,
    joined: bool,
) -> Result<(), RubyError> {
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET joined_community = ?1, updated_at = ?2 WHERE telegram_id = ?3",
                params![joined, now, telegram_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Return a user to `initial` with zero exchanges. `false` if the id is unknown.
pub async fn reset_user(db: &Database, telegram_id: i64) -> Result<bool, RubyError> {
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET conversation_state = 'initial', exchange_count = 0, updated_at = ?1
                 WHERE telegram_id = ?2",
                params![now, telegram_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Every known Telegram id, oldest registration first. Users registered in
/// the same millisecond are ordered by id.
pub async fn list_user_ids(db: &Database) -> Result<Vec<i64>, RubyError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT telegram_id FROM users ORDER BY created_at, telegram_id")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<Vec<i64>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Users whose last interaction is at or after `cutoff`.
pub async fn count_active_since(db: &Database, cutoff: &str) -> Result<u64, RubyError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM users WHERE last_interaction >= ?1",
                params![cutoff],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n.max(0) as u64)
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_db;

    fn profile(id: i64, username: &str) -> UserProfile {
        UserProfile {
            telegram_id: id,
            username: Some(username.to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn new_user_starts_initial_with_zero_exchanges() {
        let (db, _dir) = temp_db().await;
        let user = upsert_user(&db, &profile(42, "alice")).await.unwrap();

        assert_eq!(user.telegram_id, 42);
        assert_eq!(user.conversation_state, ConversationState::Initial);
        assert_eq!(user.exchange_count, 0);
        assert!(!user.joined_community);
        assert!(user.last_interaction.is_none());
        assert_eq!(user.username.as_deref(), Some("alice"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_user_returns_none() {
        let (db, _dir) = temp_db().await;
        assert!(get_user(&db, 7).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_existing_user_keeps_progress() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &profile(1, "old")).await.unwrap();
        update_state(&db, 1, &ConversationState::Greeting, 4).await.unwrap();

        let again = upsert_user(&db, &profile(1, "new")).await.unwrap();
        assert_eq!(again.username.as_deref(), Some("new"));
        assert_eq!(again.exchange_count, 4);
        assert_eq!(again.conversation_state, ConversationState::Greeting);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_state_stamps_last_interaction() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &profile(5, "bob")).await.unwrap();
        update_state(&db, 5, &ConversationState::Greeting, 1).await.unwrap();

        let user = get_user(&db, 5).await.unwrap().unwrap();
        assert_eq!(user.conversation_state, ConversationState::Greeting);
        assert_eq!(user.exchange_count, 1);
        assert!(user.last_interaction.is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn opaque_state_round_trips() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &profile(5, "bob")).await.unwrap();
        let custom = ConversationState::from("vip");
        update_state(&db, 5, &custom, 2).await.unwrap();

        let user = get_user(&db, 5).await.unwrap().unwrap();
        assert_eq!(user.conversation_state, custom);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reset_returns_user_to_initial() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &profile(9, "carol")).await.unwrap();
        update_state(&db, 9, &ConversationState::Greeting, 6).await.unwrap();

        assert!(reset_user(&db, 9).await.unwrap());
        let user = get_user(&db, 9).await.unwrap().unwrap();
        assert_eq!(user.conversation_state, ConversationState::Initial);
        assert_eq!(user.exchange_count, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reset_unknown_user_reports_false() {
        let (db, _dir) = temp_db().await;
        assert!(!reset_user(&db, 404).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn joined_flag_is_set() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &profile(3, "dan")).await.unwrap();
        set_joined_community(&db, 3, true).await.unwrap();
        assert!(get_user(&db, 3).await.unwrap().unwrap().joined_community);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_ids_oldest_registration_first() {
        let (db, _dir) = temp_db().await;
        for id in [30, 10, 20, 5] {
            upsert_user(&db, &UserProfile::with_id(id)).await.unwrap();
        }
        db.connection()
            .call(|conn| {
                for (id, at) in [
                    (30, "2024-01-01T00:00:00.000Z"),
                    (10, "2024-02-01T00:00:00.000Z"),
                    (20, "2024-03-01T00:00:00.000Z"),
                    (5, "2024-03-01T00:00:00.000Z"),
                ] {
                    conn.execute(
                        "UPDATE users SET created_at = ?1 WHERE telegram_id = ?2",
                        params![at, id],
                    )?;
                }
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        assert_eq!(list_user_ids(&db).await.unwrap(), vec![30, 10, 5, 20]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn active_count_uses_last_interaction() {
        let (db, _dir) = temp_db().await;
        upsert_user(&db, &UserProfile::with_id(1)).await.unwrap();
        upsert_user(&db, &UserProfile::with_id(2)).await.unwrap();
        update_state(&db, 1, &ConversationState::Greeting, 1).await.unwrap();

        assert_eq!(
            count_active_since(&db, "2000-01-01T00:00:00.000Z").await.unwrap(),
            1
        );
        assert_eq!(
            count_active_since(&db, "2999-01-01T00:00:00.000Z").await.unwrap(),
            0
        );
        db.close().await.unwrap();
    }
}
