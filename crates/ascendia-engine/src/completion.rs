//! Marking a mission complete.

use ascendia_types::{CompletionOutcome, MissionStatus, ProfilePatch, UserIdentity};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::archetypes::ArchetypeLookup;
use crate::daily::{get_me, reconcile_profile};
use crate::progression::is_day_secured;
use crate::reconcile::record_secured_day;
use crate::store::Store;
use crate::{calendar, EngineConfig, EngineError, Result};

/// Complete `mission_id` for the caller and settle its day if every mission
/// is now done.
///
/// Completing an already completed mission changes nothing. Failed and
/// skipped missions are closed and reject completion.
pub fn complete_mission<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    identity: &UserIdentity,
    mission_id: &str,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome> {
    let user_id = identity.user_id.as_str();
    let profile = get_me(store, identity)?;
    reconcile_profile(store, archetypes, config, profile, now)?;

    let mission = store.get_mission(mission_id, user_id)?;
    match mission.status {
        MissionStatus::Pending => {
            let changed = store.update_mission_status(
                mission_id,
                user_id,
                MissionStatus::Completed,
                Some(calendar::unix_seconds(now)),
            )?;
            if changed {
                let current = store.get_profile(user_id)?;
                let patch = ProfilePatch {
                    total_missions_completed: Some(current.total_missions_completed + 1),
                    ..ProfilePatch::default()
                };
                store.upsert_profile(user_id, &patch)?;
                debug!(%user_id, %mission_id, date = %mission.date_key, "mission completed");
            }
        }
        MissionStatus::Completed => {}
        status @ (MissionStatus::Failed | MissionStatus::Skipped) => {
            return Err(EngineError::Validation(format!(
                "mission is {status} and can no longer be completed"
            )));
        }
    }

    let profile = store.get_profile(user_id)?;
    let missions = store.list_missions(user_id, mission.date_key)?;
    let profile = if is_day_secured(&missions) {
        record_secured_day(store, config, profile, mission.date_key, missions.len() as u32)?
    } else {
        profile
    };

    Ok(CompletionOutcome { profile, missions })
}
