//! Progress log query functions.

use ascendia_types::{DateKey, ProgressLogEntry};
use rusqlite::Connection;

use super::date_col_required;
use crate::{DbError, Result};

/// Upsert keyed by (user, date).
pub fn upsert(conn: &Connection, entry: &ProgressLogEntry, now: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO progress_log (user_id, date_key, completed_missions, failed, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(user_id, date_key) DO UPDATE SET
            completed_missions = excluded.completed_missions,
            failed = excluded.failed,
            updated_at = excluded.updated_at",
        rusqlite::params![
            entry.user_id,
            entry.date_key.to_string(),
            entry.completed_missions,
            entry.failed,
            now as i64,
        ],
    )?;
    Ok(())
}

/// Get the entry for one day.
pub fn get(conn: &Connection, user_id: &str, date_key: DateKey) -> Result<ProgressLogEntry> {
    conn.query_row(
        "SELECT user_id, date_key, completed_missions, failed
         FROM progress_log WHERE user_id = ?1 AND date_key = ?2",
        rusqlite::params![user_id, date_key.to_string()],
        |row| {
            Ok(ProgressLogEntry {
                user_id: row.get(0)?,
                date_key: date_col_required(row, 1)?,
                completed_missions: row.get(2)?,
                failed: row.get(3)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            DbError::NotFound(format!("progress log {user_id}@{date_key}"))
        }
        other => DbError::from(other),
    })
}

/// All entries of one user, oldest first.
pub fn list(conn: &Connection, user_id: &str) -> Result<Vec<ProgressLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, date_key, completed_missions, failed
         FROM progress_log WHERE user_id = ?1 ORDER BY date_key",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok(ProgressLogEntry {
                user_id: row.get(0)?,
                date_key: date_col_required(row, 1)?,
                completed_missions: row.get(2)?,
                failed: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
