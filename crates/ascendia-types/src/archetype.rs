//! Mentor archetypes controlling mission difficulty.

use serde::{Deserialize, Serialize};

/// Messaging tone of an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeTone {
    Strict,
    Calm,
    Aggressive,
    Silent,
}

impl ArchetypeTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchetypeTone::Strict => "strict",
            ArchetypeTone::Calm => "calm",
            ArchetypeTone::Aggressive => "aggressive",
            ArchetypeTone::Silent => "silent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(ArchetypeTone::Strict),
            "calm" => Some(ArchetypeTone::Calm),
            "aggressive" => Some(ArchetypeTone::Aggressive),
            "silent" => Some(ArchetypeTone::Silent),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub difficulty_multiplier: f64,
    pub tone: ArchetypeTone,
    pub message_style: Option<String>,
}
