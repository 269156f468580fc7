//! Profile query functions.
//!
//! Every function takes the resolved [`SchemaCaps`] so that the watermark
//! column is only touched when the schema has it.

use ascendia_types::{Profile, ProfilePatch, DEFAULT_TIMEZONE};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

use super::date_col;
use crate::{DbError, Result, SchemaCaps};

const BASE_COLUMNS: &str = "user_id, email, timezone, archetype_id, current_streak, \
     longest_streak, level, successful_days, total_missions_completed, last_success_date, \
     created_at, updated_at";

fn columns(caps: &SchemaCaps) -> String {
    if caps.reconcile_watermark {
        format!("{BASE_COLUMNS}, last_reconciled_date")
    } else {
        BASE_COLUMNS.to_string()
    }
}

fn map_row(row: &Row<'_>, caps: &SchemaCaps) -> rusqlite::Result<Profile> {
    Ok(Profile {
        user_id: row.get(0)?,
        email: row.get(1)?,
        timezone: row.get(2)?,
        archetype_id: row.get(3)?,
        current_streak: row.get(4)?,
        longest_streak: row.get(5)?,
        level: row.get(6)?,
        successful_days: row.get(7)?,
        total_missions_completed: row.get::<_, i64>(8)? as u64,
        last_success_date: date_col(row, 9)?,
        created_at: row.get::<_, i64>(10)? as u64,
        updated_at: row.get::<_, i64>(11)? as u64,
        last_reconciled_date: if caps.reconcile_watermark {
            date_col(row, 12)?
        } else {
            None
        },
    })
}

/// Get a profile by user id.
pub fn get(conn: &Connection, caps: &SchemaCaps, user_id: &str) -> Result<Profile> {
    let sql = format!("SELECT {} FROM profiles WHERE user_id = ?1", columns(caps));
    conn.query_row(&sql, [user_id], |row| map_row(row, caps))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("profile '{user_id}'")),
            other => DbError::from(other),
        })
}

/// Insert a default profile if none exists.
pub fn ensure(conn: &Connection, user_id: &str, now: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (user_id, timezone, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(user_id) DO NOTHING",
        rusqlite::params![user_id, DEFAULT_TIMEZONE, now as i64],
    )?;
    Ok(())
}

/// Upsert keyed by user id: only the fields present in `patch` change.
pub fn upsert(
    conn: &Connection,
    caps: &SchemaCaps,
    user_id: &str,
    patch: &ProfilePatch,
    now: u64,
) -> Result<Profile> {
    ensure(conn, user_id, now)?;

    let mut sets: Vec<(&str, Value)> = Vec::new();
    if let Some(email) = &patch.email {
        sets.push(("email", Value::Text(email.clone())));
    }
    if let Some(tz) = &patch.timezone {
        sets.push(("timezone", Value::Text(tz.clone())));
    }
    if let Some(archetype) = &patch.archetype_id {
        sets.push(("archetype_id", Value::Text(archetype.clone())));
    }
    if let Some(v) = patch.current_streak {
        sets.push(("current_streak", Value::Integer(i64::from(v))));
    }
    if let Some(v) = patch.longest_streak {
        sets.push(("longest_streak", Value::Integer(i64::from(v))));
    }
    if let Some(v) = patch.level {
        sets.push(("level", Value::Integer(i64::from(v))));
    }
    if let Some(v) = patch.successful_days {
        sets.push(("successful_days", Value::Integer(i64::from(v))));
    }
    if let Some(v) = patch.total_missions_completed {
        sets.push(("total_missions_completed", Value::Integer(v as i64)));
    }
    if let Some(d) = patch.last_success_date {
        sets.push(("last_success_date", Value::Text(d.to_string())));
    }
    if let Some(d) = patch.last_reconciled_date {
        if !caps.reconcile_watermark {
            return Err(DbError::SchemaUnavailable(
                "profiles.last_reconciled_date".into(),
            ));
        }
        sets.push(("last_reconciled_date", Value::Text(d.to_string())));
    }

    if !sets.is_empty() {
        let assignments = sets
            .iter()
            .enumerate()
            .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let n = sets.len();
        let sql = format!(
            "UPDATE profiles SET {assignments}, updated_at = ?{} WHERE user_id = ?{}",
            n + 1,
            n + 2
        );
        let mut values: Vec<Value> = sets.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Integer(now as i64));
        values.push(Value::Text(user_id.to_string()));
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
    }

    get(conn, caps, user_id)
}

/// One page of profiles in stable order.
pub fn list_page(
    conn: &Connection,
    caps: &SchemaCaps,
    offset: u64,
    limit: u64,
) -> Result<Vec<Profile>> {
    let sql = format!(
        "SELECT {} FROM profiles ORDER BY created_at, user_id LIMIT ?1 OFFSET ?2",
        columns(caps)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![limit as i64, offset as i64], |row| {
            map_row(row, caps)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Delete a profile; missions and progress log rows cascade.
pub fn delete(conn: &Connection, user_id: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM profiles WHERE user_id = ?1", [user_id])?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascendia_types::DateKey;

    fn test_db() -> (Connection, SchemaCaps) {
        let conn = crate::open_memory().expect("open test db");
        let caps = SchemaCaps::detect(&conn).expect("caps");
        (conn, caps)
    }

    fn key(s: &str) -> DateKey {
        s.parse().expect("date key")
    }

    #[test]
    fn test_upsert_creates_defaults() {
        let (conn, caps) = test_db();
        let p = upsert(&conn, &caps, "u1", &ProfilePatch::default(), 100).expect("upsert");
        assert_eq!(p.user_id, "u1");
        assert_eq!(p.timezone, "UTC");
        assert_eq!(p.level, 1);
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.last_success_date, None);
        assert_eq!(p.last_reconciled_date, None);
        assert_eq!(p.created_at, 100);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (conn, caps) = test_db();
        let patch = ProfilePatch {
            timezone: Some("Europe/Paris".into()),
            current_streak: Some(4),
            longest_streak: Some(6),
            last_success_date: Some(key("2026-02-01")),
            ..Default::default()
        };
        upsert(&conn, &caps, "u1", &patch, 100).expect("first");

        let patch = ProfilePatch {
            current_streak: Some(0),
            last_reconciled_date: Some(key("2026-02-03")),
            ..Default::default()
        };
        let p = upsert(&conn, &caps, "u1", &patch, 200).expect("second");
        assert_eq!(p.timezone, "Europe/Paris");
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.longest_streak, 6);
        assert_eq!(p.last_success_date, Some(key("2026-02-01")));
        assert_eq!(p.last_reconciled_date, Some(key("2026-02-03")));
        assert_eq!(p.created_at, 100);
        assert_eq!(p.updated_at, 200);
    }

    #[test]
    fn test_legacy_schema_rejects_watermark_write() {
        let conn = crate::open_memory_at(1).expect("open v1");
        let caps = SchemaCaps::detect(&conn).expect("caps");
        let p = upsert(&conn, &caps, "u1", &ProfilePatch::default(), 1).expect("upsert");
        assert_eq!(p.last_reconciled_date, None);

        let patch = ProfilePatch {
            last_reconciled_date: Some(key("2026-02-03")),
            ..Default::default()
        };
        let result = upsert(&conn, &caps, "u1", &patch, 2);
        assert!(matches!(result, Err(DbError::SchemaUnavailable(_))));
    }

    #[test]
    fn test_get_missing() {
        let (conn, caps) = test_db();
        assert!(matches!(get(&conn, &caps, "ghost"), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_list_page_paginates() {
        let (conn, caps) = test_db();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            upsert(&conn, &caps, id, &ProfilePatch::default(), i as u64).expect("upsert");
        }
        let first = list_page(&conn, &caps, 0, 2).expect("page 1");
        let second = list_page(&conn, &caps, 2, 2).expect("page 2");
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].user_id, "c");
    }

    #[test]
    fn test_delete() {
        let (conn, caps) = test_db();
        upsert(&conn, &caps, "u1", &ProfilePatch::default(), 1).expect("upsert");
        assert!(delete(&conn, "u1").expect("delete"));
        assert!(!delete(&conn, "u1").expect("delete again"));
    }
}
