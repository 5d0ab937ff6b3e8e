// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named integer counters in `bot_stats`.

use std::collections::BTreeMap;

use rubybot_core::RubyError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Add `by` to a counter, creating it at `by` if absent.
///
/// Runs as a single upsert so concurrent increments never lose an update.
pub async fn increment(db: &Database, metric: &str, by: i64) -> Result<(), RubyError> {
    let metric = metric.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_stats (metric_name, metric_value) VALUES (?1, ?2)
                 ON CONFLICT(metric_name) DO UPDATE SET metric_value = metric_value + excluded.metric_value",
                params![metric, by],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Every counter keyed by name.
pub async fn get_all(db: &Database) -> Result<BTreeMap<String, i64>, RubyError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT metric_name, metric_value FROM bot_stats")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<BTreeMap<String, i64>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
