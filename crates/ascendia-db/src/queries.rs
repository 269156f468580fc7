//! Database query functions organized by table.

pub mod archetypes;
pub mod missions;
pub mod profiles;
pub mod progress;

use ascendia_types::DateKey;
use rusqlite::types::Type;
use rusqlite::Row;

/// Read an optional `YYYY-MM-DD` text column.
pub(crate) fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateKey>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

/// Read a required `YYYY-MM-DD` text column.
pub(crate) fn date_col_required(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateKey> {
    date_col(row, idx)?.ok_or(rusqlite::Error::InvalidColumnType(
        idx,
        "date_key".into(),
        Type::Null,
    ))
}

/// Comma separated `?N` placeholders starting at `first`.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
