//! # ascendia-types
//!
//! Shared domain types used across the Ascendia workspace: calendar date keys,
//! missions, profiles, archetypes and the response shapes returned by the
//! engine's produced operations.

pub mod archetype;
pub mod date;
pub mod mission;
pub mod profile;
pub mod progress;

pub use archetype::{Archetype, ArchetypeTone};
pub use date::{DateKey, DateKeyError};
pub use mission::{Mission, MissionStatus, MissionType, NewMission};
pub use profile::{Profile, ProfilePatch, ProfileUpdate, Progression, UserIdentity};
pub use progress::{
    CompletionOutcome, DayRollup, ProgressLogEntry, ProgressRollup, RollupTotals, SweepFailure,
    SweepReport, TodayMissions,
};

/// Number of successful days between level-ups unless configured otherwise.
pub const DEFAULT_LEVEL_UP_EVERY_DAYS: u32 = 7;

/// Timezone assigned to profiles that never set one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Number of days covered by the progress rollup.
pub const ROLLUP_DAYS: usize = 7;
