//! Archetype lookup.
//!
//! Archetypes are reference data. Deployments without the archetype table
//! fall back to [`BuiltinArchetypes`].

use ascendia_types::{Archetype, ArchetypeTone};

use crate::Result;

/// Read access to archetype reference data.
pub trait ArchetypeLookup {
    fn list(&self) -> Result<Vec<Archetype>>;

    fn find(&self, id: &str) -> Result<Option<Archetype>>;

    /// Difficulty multiplier for `id`, or 1.0 when unset, unknown or unreadable.
    fn resolve_difficulty_multiplier(&self, id: Option<&str>) -> f64 {
        let Some(id) = id else {
            return 1.0;
        };
        match self.find(id) {
            Ok(Some(archetype)) => archetype.difficulty_multiplier,
            Ok(None) => 1.0,
            Err(e) => {
                tracing::warn!(archetype_id = %id, error = %e, "archetype lookup failed; using 1.0");
                1.0
            }
        }
    }
}

/// The default archetype table, held in memory.
#[derive(Debug, Clone)]
pub struct BuiltinArchetypes {
    archetypes: Vec<Archetype>,
}

impl Default for BuiltinArchetypes {
    fn default() -> Self {
        let entry = |id: &str, name: &str, description: &str, multiplier: f64, tone: ArchetypeTone| {
            Archetype {
                id: id.into(),
                display_name: name.into(),
                description: description.into(),
                difficulty_multiplier: multiplier,
                tone,
                message_style: Some(tone.as_str().to_string()),
            }
        };
        Self {
            archetypes: vec![
                entry(
                    "shadow-ascendant",
                    "Shadow Ascendant",
                    "Ruthless discipline. No excuses. No negotiation.",
                    1.2,
                    ArchetypeTone::Strict,
                ),
                entry(
                    "iron-sentinel",
                    "Iron Sentinel",
                    "Balanced structure. Consistency over intensity.",
                    1.0,
                    ArchetypeTone::Calm,
                ),
                entry(
                    "flame-vanguard",
                    "Flame Vanguard",
                    "Aggressive pace. Momentum is mandatory.",
                    1.1,
                    ArchetypeTone::Aggressive,
                ),
            ],
        }
    }
}

impl ArchetypeLookup for BuiltinArchetypes {
    fn list(&self) -> Result<Vec<Archetype>> {
        Ok(self.archetypes.clone())
    }

    fn find(&self, id: &str) -> Result<Option<Archetype>> {
        Ok(self.archetypes.iter().find(|a| a.id == id).cloned())
    }
}
