//! # ascendia-db
//!
//! SQLite storage for profiles, missions, the progress log and archetypes.
//!
//! - WAL mode, foreign keys enforced
//! - Timestamps are Unix epoch seconds
//! - Date keys are stored as `YYYY-MM-DD` text, so lexical order is calendar order
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// The expected table or column does not exist (schema not deployed).
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(_, Some(msg)) = &err {
            if msg.contains("no such table") || msg.contains("no such column") {
                return DbError::SchemaUnavailable(msg.clone());
            }
        }
        DbError::Sqlite(err)
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Storage capabilities resolved once from the live schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaCaps {
    /// `profiles.last_reconciled_date` exists.
    pub reconcile_watermark: bool,
}

impl SchemaCaps {
    /// Inspect the `profiles` table. A missing table reports no capabilities.
    pub fn detect(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("PRAGMA table_info(profiles)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            reconcile_watermark: columns.iter().any(|c| c == "last_reconciled_date"),
        })
    }
}

/// Open or create the database at the given path and run pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database migrated only up to `version`.
pub fn open_memory_at(version: u32) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run_to(&conn, version)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Generate an opaque 128-bit row id.
pub(crate) fn new_row_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_memory().expect("open");
        let fk: i32 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_caps_follow_schema_version() {
        let legacy = open_memory_at(1).expect("open v1");
        assert!(!SchemaCaps::detect(&legacy).expect("detect").reconcile_watermark);

        let current = open_memory().expect("open");
        assert!(SchemaCaps::detect(&current).expect("detect").reconcile_watermark);
    }

    #[test]
    fn test_missing_table_is_schema_unavailable() {
        let conn = open_memory().expect("open");
        let err = conn
            .execute("DELETE FROM not_a_table", [])
            .map_err(DbError::from)
            .expect_err("missing table");
        assert!(matches!(err, DbError::SchemaUnavailable(_)));
    }

    #[test]
    fn test_row_ids_are_unique_hex() {
        let a = new_row_id();
        let b = new_row_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
