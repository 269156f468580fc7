//! Progress log entries and the response shapes of produced operations.

use serde::{Deserialize, Serialize};

use crate::{DateKey, Mission, Profile};

/// Write-once-per-day audit row mirroring a reconciliation decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLogEntry {
    pub user_id: String,
    pub date_key: DateKey,
    pub completed_missions: u32,
    pub failed: bool,
}

/// Result of "get or create today's missions".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodayMissions {
    pub date_key: DateKey,
    pub missions: Vec<Mission>,
    pub profile: Profile,
}

/// Result of completing one mission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub profile: Profile,
    pub missions: Vec<Mission>,
}

/// Mission totals for one day of the rollup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRollup {
    pub date_key: DateKey,
    pub total: u32,
    pub completed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupTotals {
    pub total_missions_completed: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level: u32,
}

/// Last-7-days rollup, newest day first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressRollup {
    pub profile: Profile,
    pub days: Vec<DayRollup>,
    pub totals: RollupTotals,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    pub user_id: String,
    pub message: String,
}

/// Aggregate result of a reconciliation sweep over all users.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub ok: bool,
    pub processed: u32,
    pub reconciled: u32,
    pub errors: Vec<SweepFailure>,
}
