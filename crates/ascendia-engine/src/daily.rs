//! Request-scoped operations: profile management, today's missions and the
//! seven-day rollup.
//!
//! Every operation that touches missions first reconciles the days before
//! "today" in the user's timezone.

use ascendia_types::{
    Archetype, DayRollup, Profile, ProfilePatch, ProfileUpdate, ProgressRollup, RollupTotals,
    TodayMissions, UserIdentity, ROLLUP_DAYS,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::archetypes::ArchetypeLookup;
use crate::calendar;
use crate::reconcile::{ensure_missions, reconcile};
use crate::store::{Store, UserStore};
use crate::{EngineConfig, EngineError, Result};

/// Get-or-create the caller's profile, refreshing the email when it changed.
pub fn get_me<S: UserStore + ?Sized>(store: &S, identity: &UserIdentity) -> Result<Profile> {
    match store.get_profile(&identity.user_id) {
        Ok(profile) if identity.email.is_none() || profile.email == identity.email => Ok(profile),
        Ok(_) | Err(EngineError::NotFound(_)) => {
            let patch = ProfilePatch {
                email: identity.email.clone(),
                ..ProfilePatch::default()
            };
            store.upsert_profile(&identity.user_id, &patch)
        }
        Err(e) => Err(e),
    }
}

/// Change timezone and/or archetype. Input is validated before any write.
pub fn update_profile<S: UserStore + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    identity: &UserIdentity,
    update: &ProfileUpdate,
) -> Result<Profile> {
    let archetype_id = update.archetype_id.as_deref().filter(|id| !id.is_empty());
    if let Some(id) = archetype_id {
        if archetypes.find(id)?.is_none() {
            return Err(EngineError::Validation("Unknown archetypeId".into()));
        }
    }
    if let Some(tz) = update.timezone.as_deref() {
        if !calendar::is_known_timezone(tz) {
            return Err(EngineError::Validation(format!("Unknown timezone '{tz}'")));
        }
    }

    get_me(store, identity)?;
    let patch = ProfilePatch {
        timezone: update.timezone.clone(),
        archetype_id: archetype_id.map(str::to_owned),
        ..ProfilePatch::default()
    };
    store.upsert_profile(&identity.user_id, &patch)
}

/// Delete the caller's profile together with its missions and log.
pub fn delete_account<S: UserStore + ?Sized>(store: &S, identity: &UserIdentity) -> Result<()> {
    if store.delete_profile(&identity.user_id)? {
        Ok(())
    } else {
        Err(EngineError::NotFound(format!(
            "profile '{}'",
            identity.user_id
        )))
    }
}

pub fn list_archetypes(archetypes: &dyn ArchetypeLookup) -> Result<Vec<Archetype>> {
    archetypes.list()
}

/// Reconcile `profile` up to yesterday in its own timezone.
pub fn reconcile_profile<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    profile: Profile,
    now: DateTime<Utc>,
) -> Result<Profile> {
    let today = calendar::date_key_in_time_zone(now, &profile.timezone);
    let difficulty = archetypes.resolve_difficulty_multiplier(profile.archetype_id.as_deref());
    reconcile(store, config, profile, today, difficulty)
}

/// Reconcile one user by id. The profile must already exist.
pub fn reconcile_user<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Profile> {
    let profile = store.get_profile(user_id)?;
    reconcile_profile(store, archetypes, config, profile, now)
}

/// Get or create today's missions after catching up on past days.
pub fn today_missions<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    identity: &UserIdentity,
    now: DateTime<Utc>,
) -> Result<TodayMissions> {
    let profile = get_me(store, identity)?;
    let date_key = calendar::date_key_in_time_zone(now, &profile.timezone);
    let difficulty = archetypes.resolve_difficulty_multiplier(profile.archetype_id.as_deref());

    let profile = reconcile(store, config, profile, date_key, difficulty)?;
    let progression = profile.progression();
    let missions = ensure_missions(
        store,
        &identity.user_id,
        date_key,
        difficulty,
        Some(&progression),
        config.missions_per_day,
    )?;
    debug!(user_id = %identity.user_id, %date_key, missions = missions.len(), "today's missions");

    Ok(TodayMissions {
        date_key,
        missions,
        profile,
    })
}

/// Per-day totals for today and the six days before, newest first.
pub fn last7<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    identity: &UserIdentity,
    now: DateTime<Utc>,
) -> Result<ProgressRollup> {
    let profile = get_me(store, identity)?;
    let profile = reconcile_profile(store, archetypes, config, profile, now)?;

    let today = calendar::date_key_in_time_zone(now, &profile.timezone);
    let keys = calendar::trailing_days(today, ROLLUP_DAYS);
    let oldest = today.add_days(1 - ROLLUP_DAYS as i64);
    let missions = store.list_missions_between(&identity.user_id, oldest, today)?;

    let days = keys
        .into_iter()
        .map(|date_key| {
            let of_day = missions.iter().filter(|m| m.date_key == date_key);
            DayRollup {
                date_key,
                total: of_day.clone().count() as u32,
                completed: of_day.filter(|m| m.is_completed()).count() as u32,
            }
        })
        .collect();

    let totals = RollupTotals {
        total_missions_completed: profile.total_missions_completed,
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        level: profile.level,
    };
    Ok(ProgressRollup {
        profile,
        days,
        totals,
    })
}
