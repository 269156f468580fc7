//! Storage collaborators used by the engine.
//!
//! The engine never touches SQL directly. Each concern is a narrow trait so
//! that tests and alternate backends can substitute their own
//! implementation; [`sqlite`] adapts `ascendia-db`.

pub mod sqlite;

use ascendia_types::{DateKey, Mission, MissionStatus, NewMission, Profile, ProfilePatch};

use crate::Result;

pub use sqlite::{SqliteArchetypes, SqliteStore};

pub trait UserStore {
    /// Whether profiles carry the `last_reconciled_date` watermark.
    fn supports_watermark(&self) -> bool;

    fn get_profile(&self, user_id: &str) -> Result<Profile>;

    /// Create the profile if missing, then write the fields present in `patch`.
    fn upsert_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<Profile>;

    fn list_profiles_page(&self, offset: u64, limit: u64) -> Result<Vec<Profile>>;

    /// Returns whether a profile was removed.
    fn delete_profile(&self, user_id: &str) -> Result<bool>;
}

pub trait MissionStore {
    fn list_missions(&self, user_id: &str, date_key: DateKey) -> Result<Vec<Mission>>;

    fn list_missions_between(
        &self,
        user_id: &str,
        from: DateKey,
        to: DateKey,
    ) -> Result<Vec<Mission>>;

    fn get_mission(&self, mission_id: &str, user_id: &str) -> Result<Mission>;

    /// Insert keyed by (user, date, type); existing rows are kept as-is.
    fn upsert_missions(
        &self,
        user_id: &str,
        date_key: DateKey,
        missions: &[NewMission],
    ) -> Result<Vec<Mission>>;

    fn update_mission_status(
        &self,
        mission_id: &str,
        user_id: &str,
        status: MissionStatus,
        completed_at: Option<u64>,
    ) -> Result<bool>;

    /// Move the still-pending missions among `ids` to `status`.
    fn bulk_update_status(
        &self,
        ids: &[String],
        user_id: &str,
        status: MissionStatus,
    ) -> Result<usize>;
}

pub trait ProgressLogStore {
    /// Upsert keyed by (user, date).
    fn upsert_progress_log(
        &self,
        user_id: &str,
        date_key: DateKey,
        completed_missions: u32,
        failed: bool,
    ) -> Result<()>;
}

/// Everything reconciliation needs.
pub trait Store: UserStore + MissionStore + ProgressLogStore {}

impl<T: UserStore + MissionStore + ProgressLogStore + ?Sized> Store for T {}
