//! Mission types and lifecycle states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DateKey;

/// Fixed enumeration of mission kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Pushups,
    Squats,
    Plank,
    Crunches,
    Run,
}

impl MissionType {
    /// All mission types in canonical selection order.
    pub const ALL: [MissionType; 5] = [
        MissionType::Pushups,
        MissionType::Squats,
        MissionType::Plank,
        MissionType::Crunches,
        MissionType::Run,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionType::Pushups => "pushups",
            MissionType::Squats => "squats",
            MissionType::Plank => "plank",
            MissionType::Crunches => "crunches",
            MissionType::Run => "run",
        }
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MissionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown mission type '{s}'"))
    }
}

/// Mission lifecycle: `pending -> completed` or `pending -> failed`.
///
/// `Skipped` is reserved and never assigned by current flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    Completed,
    Failed,
    Skipped,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Pending => "pending",
            MissionStatus::Completed => "completed",
            MissionStatus::Failed => "failed",
            MissionStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MissionStatus::Pending),
            "completed" => Ok(MissionStatus::Completed),
            "failed" => Ok(MissionStatus::Failed),
            "skipped" => Ok(MissionStatus::Skipped),
            other => Err(format!("unknown mission status '{other}'")),
        }
    }
}

/// A persisted mission row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub user_id: String,
    pub date_key: DateKey,
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    pub target_value: u32,
    pub status: MissionStatus,
    pub created_at: u64,
    pub completed_at: Option<u64>,
}

impl Mission {
    pub fn is_completed(&self) -> bool {
        self.status == MissionStatus::Completed
    }
}

/// A mission about to be inserted; the store assigns id and timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMission {
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    pub target_value: u32,
    pub status: MissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_type_strings() {
        for t in MissionType::ALL {
            assert_eq!(t.as_str().parse::<MissionType>(), Ok(t));
        }
        assert!("burpees".parse::<MissionType>().is_err());
    }

    #[test]
    fn test_mission_serializes_type_field() {
        let nm = NewMission {
            mission_type: MissionType::Plank,
            target_value: 60,
            status: MissionStatus::Pending,
        };
        let json = serde_json::to_value(&nm).expect("serialize");
        assert_eq!(json["type"], "plank");
        assert_eq!(json["status"], "pending");
    }
}
