//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are forward-only.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    run_to(conn, SCHEMA_VERSION)
}

/// Migrate up to and including `target`.
pub fn run_to(conn: &Connection, target: u32) -> Result<()> {
    let current_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if current_version > SCHEMA_VERSION || target > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {} is newer than supported {SCHEMA_VERSION}",
            current_version.max(target)
        )));
    }

    for version in (current_version + 1)..=target {
        tracing::info!("Running migration to v{version}");
        run_migration(conn, version)?;
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

/// Seed the built-in archetypes.
fn insert_default_archetypes(conn: &Connection) -> Result<()> {
    let defaults = [
        (
            "shadow-ascendant",
            "Shadow Ascendant",
            "Ruthless discipline. No excuses. No negotiation.",
            1.2,
            "strict",
        ),
        (
            "iron-sentinel",
            "Iron Sentinel",
            "Balanced structure. Consistency over intensity.",
            1.0,
            "calm",
        ),
        (
            "flame-vanguard",
            "Flame Vanguard",
            "Aggressive pace. Momentum is mandatory.",
            1.1,
            "aggressive",
        ),
    ];

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO archetypes
            (id, display_name, description, difficulty_multiplier, tone, message_style, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)",
    )?;

    for (order, (id, name, description, multiplier, tone)) in defaults.iter().enumerate() {
        stmt.execute(rusqlite::params![
            id,
            name,
            description,
            multiplier,
            tone,
            order as i64
        ])?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => {
            conn.execute_batch(schema::SCHEMA_V1)?;
            insert_default_archetypes(conn)
        }
        2 => {
            conn.execute_batch(schema::SCHEMA_V2)?;
            Ok(())
        }
        _ => Err(DbError::Migration(format!(
            "Unknown migration version: {version}"
        ))),
    }
}
