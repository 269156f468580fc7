//! Streak and level transitions.
//!
//! A closed day resolves to exactly one [`DayOutcome`]. The transition
//! functions here are pure; callers persist the resulting patch.

use ascendia_types::{DateKey, Mission, Profile, ProfilePatch};

use crate::archetypes::ArchetypeLookup;
use crate::EngineConfig;

/// Final state of a closed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// At least one mission, all completed.
    Secured,
    /// Anything else, including a day with no missions.
    Broken,
}

/// The progression fields of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub successful_days: u32,
    pub level: u32,
    pub last_success_date: Option<DateKey>,
}

impl StreakState {
    pub fn of(profile: &Profile) -> Self {
        Self {
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            successful_days: profile.successful_days,
            level: profile.level,
            last_success_date: profile.last_success_date,
        }
    }

    /// Patch containing only the fields that differ from `before`.
    pub fn to_patch(&self, before: &StreakState) -> ProfilePatch {
        let changed = |new: u32, old: u32| (new != old).then_some(new);
        ProfilePatch {
            current_streak: changed(self.current_streak, before.current_streak),
            longest_streak: changed(self.longest_streak, before.longest_streak),
            successful_days: changed(self.successful_days, before.successful_days),
            level: changed(self.level, before.level),
            last_success_date: if self.last_success_date != before.last_success_date {
                self.last_success_date
            } else {
                None
            },
            ..ProfilePatch::default()
        }
    }
}

/// A day is secured iff it has at least one mission and every one is completed.
pub fn is_day_secured(missions: &[Mission]) -> bool {
    !missions.is_empty() && missions.iter().all(Mission::is_completed)
}

pub fn outcome_of(missions: &[Mission]) -> DayOutcome {
    if is_day_secured(missions) {
        DayOutcome::Secured
    } else {
        DayOutcome::Broken
    }
}

/// `1 + floor(successful_days / level_up_every_days)`.
pub fn level_for(successful_days: u32, level_up_every_days: u32) -> u32 {
    1 + successful_days / level_up_every_days.max(1)
}

/// Apply `outcome` for `date`. Returns `None` when nothing changes.
///
/// A secured day already recorded (or older than the last recorded success)
/// is a no-op, as is a broken day when the streak is already zero.
pub fn next_streak_state(
    profile: &Profile,
    date: DateKey,
    outcome: DayOutcome,
    config: &EngineConfig,
) -> Option<StreakState> {
    let before = StreakState::of(profile);
    match outcome {
        DayOutcome::Secured => {
            if let Some(last) = before.last_success_date {
                if last >= date {
                    return None;
                }
            }
            let current_streak = match before.last_success_date {
                Some(last) if date.days_since(last) == 1 => before.current_streak + 1,
                _ => 1,
            };
            let successful_days = before.successful_days + 1;
            Some(StreakState {
                current_streak,
                longest_streak: before.longest_streak.max(current_streak),
                successful_days,
                level: level_for(successful_days, config.level_up_every_days),
                last_success_date: Some(date),
            })
        }
        DayOutcome::Broken => {
            if before.current_streak == 0 {
                return None;
            }
            Some(StreakState {
                current_streak: 0,
                ..before
            })
        }
    }
}

/// Difficulty multiplier for the profile's archetype, 1.0 when unset or unknown.
pub fn difficulty_from_archetype(lookup: &dyn ArchetypeLookup, archetype_id: Option<&str>) -> f64 {
    lookup.resolve_difficulty_multiplier(archetype_id)
}
