//! Catch-up reconciliation of closed days.
//!
//! Walks every day between the resume point and yesterday in ascending
//! order. Each iteration reads the profile produced by the previous one, so
//! streak continuity is evaluated against freshly persisted state. All
//! mutations are guarded by comparisons against what is already stored,
//! which makes a second pass over the same window a no-op.

use ascendia_types::{DateKey, Mission, MissionStatus, Profile, ProfilePatch, Progression};
use tracing::debug;

use crate::generator;
use crate::progression::{next_streak_state, outcome_of, DayOutcome, StreakState};
use crate::store::{MissionStore, Store};
use crate::{EngineConfig, Result};

/// Reconcile every closed day before `today` and return the final profile.
///
/// `difficulty` is the archetype multiplier used for days that have no
/// missions yet.
pub fn reconcile<S: Store + ?Sized>(
    store: &S,
    config: &EngineConfig,
    profile: Profile,
    today: DateKey,
    difficulty: f64,
) -> Result<Profile> {
    let yesterday = today.add_days(-1);

    let Some(resume) = profile.last_reconciled_date.or(profile.last_success_date) else {
        debug!(user_id = %profile.user_id, %yesterday, "no history; committing watermark");
        return commit_watermark(store, profile, yesterday);
    };

    let start_from = resume.min(yesterday);
    let mut cursor = start_from.add_days(1);
    let mut profile = profile;
    let mut failed_detected = false;

    while cursor <= yesterday {
        let (next, outcome) = reconcile_day(store, config, profile, cursor, difficulty)?;
        profile = next;
        if outcome == DayOutcome::Broken {
            failed_detected = true;
        }
        cursor = cursor.add_days(1);
    }

    let profile = commit_watermark(store, profile, yesterday)?;
    if failed_detected {
        return store.get_profile(&profile.user_id);
    }
    Ok(profile)
}

/// Settle one closed day and return the profile to carry into the next.
fn reconcile_day<S: Store + ?Sized>(
    store: &S,
    config: &EngineConfig,
    profile: Profile,
    date: DateKey,
    difficulty: f64,
) -> Result<(Profile, DayOutcome)> {
    let progression = profile.progression();
    let missions = ensure_missions(
        store,
        &profile.user_id,
        date,
        difficulty,
        Some(&progression),
        config.missions_per_day,
    )?;
    let outcome = outcome_of(&missions);
    debug!(user_id = %profile.user_id, %date, ?outcome, missions = missions.len(), "reconciled day");

    let profile = match outcome {
        DayOutcome::Broken => record_broken_day(store, config, profile, date, &missions)?,
        DayOutcome::Secured => {
            record_secured_day(store, config, profile, date, missions.len() as u32)?
        }
    };
    Ok((profile, outcome))
}

fn record_broken_day<S: Store + ?Sized>(
    store: &S,
    config: &EngineConfig,
    profile: Profile,
    date: DateKey,
    missions: &[Mission],
) -> Result<Profile> {
    let pending: Vec<String> = missions
        .iter()
        .filter(|m| m.status == MissionStatus::Pending)
        .map(|m| m.id.clone())
        .collect();
    store.bulk_update_status(&pending, &profile.user_id, MissionStatus::Failed)?;

    let completed = missions.iter().filter(|m| m.is_completed()).count() as u32;
    store.upsert_progress_log(&profile.user_id, date, completed, true)?;

    match next_streak_state(&profile, date, DayOutcome::Broken, config) {
        Some(next) => {
            let patch = next.to_patch(&StreakState::of(&profile));
            store.upsert_profile(&profile.user_id, &patch)
        }
        None => Ok(profile),
    }
}

/// Apply the secured transition for `date` unless it is already recorded,
/// then log the day. Shared by reconciliation and mission completion.
pub fn record_secured_day<S: Store + ?Sized>(
    store: &S,
    config: &EngineConfig,
    profile: Profile,
    date: DateKey,
    completed_missions: u32,
) -> Result<Profile> {
    let Some(next) = next_streak_state(&profile, date, DayOutcome::Secured, config) else {
        return Ok(profile);
    };
    let patch = next.to_patch(&StreakState::of(&profile));
    let profile = store.upsert_profile(&profile.user_id, &patch)?;
    store.upsert_progress_log(&profile.user_id, date, completed_missions, false)?;
    debug!(
        user_id = %profile.user_id,
        %date,
        streak = profile.current_streak,
        level = profile.level,
        "day secured"
    );
    Ok(profile)
}

/// Existing missions for the day, or a freshly generated set.
pub fn ensure_missions<S: MissionStore + ?Sized>(
    store: &S,
    user_id: &str,
    date: DateKey,
    difficulty: f64,
    progression: Option<&Progression>,
    count: usize,
) -> Result<Vec<Mission>> {
    let existing = store.list_missions(user_id, date)?;
    if !existing.is_empty() {
        return Ok(existing);
    }
    let generated = generator::generate_count(date, difficulty, progression, count);
    store.upsert_missions(user_id, date, &generated)
}

/// Move the watermark to `yesterday` if the schema has one and it is behind.
fn commit_watermark<S: Store + ?Sized>(
    store: &S,
    profile: Profile,
    yesterday: DateKey,
) -> Result<Profile> {
    if !store.supports_watermark() {
        return Ok(profile);
    }
    if matches!(profile.last_reconciled_date, Some(w) if w >= yesterday) {
        return Ok(profile);
    }
    let patch = ProfilePatch {
        last_reconciled_date: Some(yesterday),
        ..ProfilePatch::default()
    };
    store.upsert_profile(&profile.user_id, &patch)
}
