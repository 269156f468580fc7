//! Mission query functions.

use ascendia_types::{DateKey, Mission, MissionStatus, MissionType, NewMission};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row};

use super::{date_col_required, placeholders};
use crate::{new_row_id, DbError, Result};

const COLUMNS: &str =
    "id, user_id, date_key, type, target_value, status, created_at, completed_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
    let mission_type: String = row.get(3)?;
    let status: String = row.get(5)?;
    Ok(Mission {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date_key: date_col_required(row, 2)?,
        mission_type: mission_type
            .parse::<MissionType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?,
        target_value: row.get(4)?,
        status: status
            .parse::<MissionStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?,
        created_at: row.get::<_, i64>(6)? as u64,
        completed_at: row.get::<_, Option<i64>>(7)?.map(|t| t as u64),
    })
}

/// Missions of one user for one day, in creation order.
pub fn list(conn: &Connection, user_id: &str, date_key: DateKey) -> Result<Vec<Mission>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM missions WHERE user_id = ?1 AND date_key = ?2
         ORDER BY created_at, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, date_key.to_string()], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Missions of one user with `from <= date_key <= to`.
pub fn list_between(
    conn: &Connection,
    user_id: &str,
    from: DateKey,
    to: DateKey,
) -> Result<Vec<Mission>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM missions
         WHERE user_id = ?1 AND date_key >= ?2 AND date_key <= ?3
         ORDER BY date_key, created_at, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            rusqlite::params![user_id, from.to_string(), to.to_string()],
            map_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Get one mission owned by `user_id`.
pub fn get(conn: &Connection, mission_id: &str, user_id: &str) -> Result<Mission> {
    let sql = format!("SELECT {COLUMNS} FROM missions WHERE id = ?1 AND user_id = ?2");
    conn.query_row(&sql, rusqlite::params![mission_id, user_id], map_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("mission '{mission_id}'")),
            other => DbError::from(other),
        })
}

/// Insert missions keyed by (user, date, type). Existing rows win; returns
/// the full mission list for the day afterwards.
pub fn upsert(
    conn: &Connection,
    user_id: &str,
    date_key: DateKey,
    missions: &[NewMission],
    now: u64,
) -> Result<Vec<Mission>> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO missions (id, user_id, date_key, type, target_value, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, date_key, type) DO NOTHING",
        )?;
        let date = date_key.to_string();
        for m in missions {
            stmt.execute(rusqlite::params![
                new_row_id(),
                user_id,
                date,
                m.mission_type.as_str(),
                m.target_value,
                m.status.as_str(),
                now as i64,
            ])?;
        }
    }
    tx.commit()?;
    list(conn, user_id, date_key)
}

/// Set the status of one mission. Returns whether a row changed; a mission
/// already in `status` is left as is.
pub fn update_status(
    conn: &Connection,
    mission_id: &str,
    user_id: &str,
    status: MissionStatus,
    completed_at: Option<u64>,
) -> Result<bool> {
    let n = conn.execute(
        "UPDATE missions SET status = ?1, completed_at = ?2
         WHERE id = ?3 AND user_id = ?4 AND status <> ?1",
        rusqlite::params![
            status.as_str(),
            completed_at.map(|t| t as i64),
            mission_id,
            user_id
        ],
    )?;
    Ok(n > 0)
}

/// Move still-pending missions from `ids` to `status`.
///
/// Rows already completed or failed are left untouched.
pub fn bulk_update_status(
    conn: &Connection,
    ids: &[String],
    user_id: &str,
    status: MissionStatus,
) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "UPDATE missions SET status = ?1
         WHERE user_id = ?2 AND status = 'pending' AND id IN ({})",
        placeholders(3, ids.len())
    );
    let mut values = vec![
        Value::Text(status.as_str().to_string()),
        Value::Text(user_id.to_string()),
    ];
    values.extend(ids.iter().map(|id| Value::Text(id.clone())));
    let n = conn.execute(&sql, rusqlite::params_from_iter(values))?;
    Ok(n)
}
