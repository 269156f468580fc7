//! Archetype query functions.

use ascendia_types::{Archetype, ArchetypeTone};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::Result;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Archetype> {
    let tone: String = row.get(4)?;
    Ok(Archetype {
        id: row.get(0)?,
        display_name: row.get(1)?,
        description: row.get(2)?,
        difficulty_multiplier: row.get(3)?,
        tone: ArchetypeTone::parse(&tone).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("unknown tone '{tone}'").into(),
            )
        })?,
        message_style: row.get(5)?,
    })
}

/// All archetypes in display order.
pub fn list(conn: &Connection) -> Result<Vec<Archetype>> {
    let mut stmt = conn.prepare(
        "SELECT id, display_name, description, difficulty_multiplier, tone, message_style
         FROM archetypes ORDER BY sort_order, display_name",
    )?;
    let rows = stmt
        .query_map([], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Get one archetype, `None` if unknown.
pub fn get(conn: &Connection, id: &str) -> Result<Option<Archetype>> {
    let row = conn
        .query_row(
            "SELECT id, display_name, description, difficulty_multiplier, tone, message_style
             FROM archetypes WHERE id = ?1",
            [id],
            map_row,
        )
        .optional()?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archetypes_seeded() {
        let conn = crate::open_memory().expect("open");
        let all = list(&conn).expect("list");
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["shadow-ascendant", "iron-sentinel", "flame-vanguard"]);

        let vanguard = get(&conn, "flame-vanguard").expect("get").expect("exists");
        assert_eq!(vanguard.tone, ArchetypeTone::Aggressive);
        assert!((vanguard.difficulty_multiplier - 1.1).abs() < f64::EPSILON);
        assert!(get(&conn, "nobody").expect("get").is_none());
    }
}
