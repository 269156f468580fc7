//! User profile and progression state.

use serde::{Deserialize, Serialize};

use crate::DateKey;

/// Caller identity resolved upstream (bearer token -> user).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// One profile per user.
///
/// Invariants: `longest_streak >= current_streak`, `level >= 1`, and
/// `last_reconciled_date`, when present, is not earlier than
/// `last_success_date`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub email: Option<String>,
    /// IANA timezone name.
    pub timezone: String,
    pub archetype_id: Option<String>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level: u32,
    pub successful_days: u32,
    pub total_missions_completed: u64,
    pub last_success_date: Option<DateKey>,
    /// Reconciliation watermark. Always `None` on storage without the column.
    pub last_reconciled_date: Option<DateKey>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Profile {
    pub fn progression(&self) -> Progression {
        Progression {
            successful_days: self.successful_days,
            current_streak: self.current_streak,
            level: self.level,
        }
    }
}

/// Snapshot of progression used to scale mission difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub successful_days: u32,
    pub current_streak: u32,
    pub level: u32,
}

/// User-editable profile settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub archetype_id: Option<String>,
}

/// Partial profile update. Only `Some` fields are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub timezone: Option<String>,
    pub archetype_id: Option<String>,
    pub current_streak: Option<u32>,
    pub longest_streak: Option<u32>,
    pub level: Option<u32>,
    pub successful_days: Option<u32>,
    pub total_missions_completed: Option<u64>,
    pub last_success_date: Option<DateKey>,
    pub last_reconciled_date: Option<DateKey>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}
