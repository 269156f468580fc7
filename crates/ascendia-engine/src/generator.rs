//! Deterministic daily mission generation.
//!
//! Missions for a day are a pure function of the date key, the archetype
//! difficulty multiplier and the progression snapshot taken when the day is
//! first generated. The type selection and noise stream are seeded from a
//! hash of the date key alone, so regenerating a day with the same inputs
//! always yields the same list.

use ascendia_types::{DateKey, MissionStatus, MissionType, NewMission, Progression};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const MIN_MISSIONS: usize = 3;
pub const MAX_MISSIONS: usize = 5;
pub const DEFAULT_MISSION_COUNT: usize = 4;

/// Bounds of the progression multiplier.
pub const PROGRESSION_FLOOR: f64 = 0.9;
pub const PROGRESSION_CEILING: f64 = 1.6;

const SUCCESS_BONUS_CAP: f64 = 0.35;
const STREAK_BONUS_CAP: f64 = 0.10;
const LEVEL_BONUS_CAP: f64 = 0.10;
const RAMP_CAP: f64 = 0.08;

/// 32-bit FNV-1a.
fn fnv1a32(bytes: &[u8]) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u32::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Unitless base target per mission type.
pub fn base_target(mission_type: MissionType) -> f64 {
    match mission_type {
        MissionType::Pushups => 20.0,
        MissionType::Squats => 30.0,
        MissionType::Plank => 60.0,
        MissionType::Crunches => 25.0,
        MissionType::Run => 15.0,
    }
}

/// Plank rounds to the nearest 10 (min 20); everything else to the nearest 5 (min 5).
pub fn round_target(mission_type: MissionType, value: f64) -> u32 {
    let (step, floor) = match mission_type {
        MissionType::Plank => (10.0, 20.0),
        _ => (5.0, 5.0),
    };
    let rounded = ((value / step).round() * step).max(floor);
    rounded as u32
}

/// Saturating bonus: 0 at `x = 0`, approaching `cap` as `x` grows.
fn saturating_bonus(x: f64, cap: f64, scale: f64) -> f64 {
    cap * (1.0 - (-x / scale).exp())
}

/// Difficulty scaling from progression, bounded to
/// [`PROGRESSION_FLOOR`, `PROGRESSION_CEILING`]. `None` means 1.0.
pub fn progression_multiplier(progression: Option<&Progression>) -> f64 {
    let Some(p) = progression else {
        return 1.0;
    };
    let days = 1.0 + saturating_bonus(f64::from(p.successful_days), SUCCESS_BONUS_CAP, 45.0);
    let streak = 1.0 + saturating_bonus(f64::from(p.current_streak), STREAK_BONUS_CAP, 14.0);
    let level = 1.0
        + saturating_bonus(
            f64::from(p.level.saturating_sub(1)),
            LEVEL_BONUS_CAP,
            6.0,
        );
    (days * streak * level).clamp(PROGRESSION_FLOOR, PROGRESSION_CEILING)
}

/// Small date-derived lift (at most +8%) from an independent hash.
pub fn gentle_ramp(date_key: DateKey) -> f64 {
    let h = fnv1a32(format!("ramp:{date_key}").as_bytes());
    1.0 + (f64::from(h % 365) / 365.0) * RAMP_CAP
}

/// Generate the default number of missions for a day.
pub fn generate(
    date_key: DateKey,
    difficulty_multiplier: f64,
    progression: Option<&Progression>,
) -> Vec<NewMission> {
    generate_count(
        date_key,
        difficulty_multiplier,
        progression,
        DEFAULT_MISSION_COUNT,
    )
}

/// Generate `count` missions (clamped to [`MIN_MISSIONS`, `MAX_MISSIONS`]).
pub fn generate_count(
    date_key: DateKey,
    difficulty_multiplier: f64,
    progression: Option<&Progression>,
    count: usize,
) -> Vec<NewMission> {
    let seed = fnv1a32(date_key.to_string().as_bytes());
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));

    let count = count.clamp(MIN_MISSIONS, MAX_MISSIONS);
    let mut pool = MissionType::ALL.to_vec();
    let mut chosen = Vec::with_capacity(count);
    while chosen.len() < count && !pool.is_empty() {
        let idx = rng.gen_range(0..pool.len());
        chosen.push(pool.remove(idx));
    }

    let difficulty = if difficulty_multiplier.is_finite() && difficulty_multiplier > 0.0 {
        difficulty_multiplier
    } else {
        1.0
    };
    let effective = difficulty * progression_multiplier(progression);
    let ramp = gentle_ramp(date_key);

    chosen
        .into_iter()
        .map(|mission_type| {
            let noise = 0.9 + rng.gen::<f64>() * 0.2;
            NewMission {
                mission_type,
                target_value: round_target(
                    mission_type,
                    base_target(mission_type) * effective * ramp * noise,
                ),
                status: MissionStatus::Pending,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn key(s: &str) -> DateKey {
        s.parse().expect("date key")
    }

    #[test]
    fn test_deterministic_without_progression() {
        let a = generate(key("2026-01-20"), 1.0, None);
        let b = generate(key("2026-01-20"), 1.0, None);
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_MISSION_COUNT);
    }

    #[test]
    fn test_types_unique_and_count_clamped() {
        for (requested, expected) in [(0, 3), (3, 3), (4, 4), (5, 5), (9, 5)] {
            let missions = generate_count(key("2026-03-14"), 1.0, None, requested);
            assert_eq!(missions.len(), expected);
            let types: HashSet<_> = missions.iter().map(|m| m.mission_type).collect();
            assert_eq!(types.len(), expected);
            assert!(missions.iter().all(|m| m.status == MissionStatus::Pending));
        }
    }

    #[test]
    fn test_selection_varies_across_dates() {
        let distinct: HashSet<Vec<MissionType>> = (1..=28)
            .map(|d| {
                let date = DateKey::from_ymd(2026, 2, d).expect("date");
                generate(date, 1.0, None)
                    .into_iter()
                    .map(|m| m.mission_type)
                    .collect()
            })
            .collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_rounding_policy() {
        assert_eq!(round_target(MissionType::Plank, 64.0), 60);
        assert_eq!(round_target(MissionType::Plank, 66.0), 70);
        assert_eq!(round_target(MissionType::Plank, 3.0), 20);
        assert_eq!(round_target(MissionType::Run, 13.0), 15);
        assert_eq!(round_target(MissionType::Pushups, 1.0), 5);
        assert_eq!(round_target(MissionType::Squats, 32.4), 30);
    }

    #[test]
    fn test_targets_follow_rounding_steps() {
        for d in 1..=31 {
            let date = DateKey::from_ymd(2026, 1, d).expect("date");
            for m in generate_count(date, 1.2, None, 5) {
                match m.mission_type {
                    MissionType::Plank => {
                        assert_eq!(m.target_value % 10, 0);
                        assert!(m.target_value >= 20);
                    }
                    _ => {
                        assert_eq!(m.target_value % 5, 0);
                        assert!(m.target_value >= 5);
                    }
                }
            }
        }
    }

    #[test]
    fn test_targets_stay_near_base_at_unit_multiplier() {
        // noise (±10%) and ramp (≤ +8%) bound the unscaled target.
        for m in generate_count(key("2026-05-05"), 1.0, None, 5) {
            let base = base_target(m.mission_type);
            let v = f64::from(m.target_value);
            assert!(v >= base * 0.9 - 10.0 && v <= base * 1.1 * 1.08 + 10.0);
        }
    }

    #[test]
    fn test_progression_multiplier_bounds() {
        assert_eq!(progression_multiplier(None), 1.0);

        let fresh = Progression {
            successful_days: 0,
            current_streak: 0,
            level: 1,
        };
        assert!((progression_multiplier(Some(&fresh)) - 1.0).abs() < 1e-9);

        let veteran = Progression {
            successful_days: 10_000,
            current_streak: 10_000,
            level: 10_000,
        };
        assert!((progression_multiplier(Some(&veteran)) - PROGRESSION_CEILING).abs() < 1e-9);

        let mid = Progression {
            successful_days: 30,
            current_streak: 5,
            level: 5,
        };
        let m = progression_multiplier(Some(&mid));
        assert!(m > 1.0 && m < PROGRESSION_CEILING);
    }

    #[test]
    fn test_progression_is_monotonic_in_successful_days() {
        let mut last = 0.0;
        for days in [0, 7, 30, 90, 365] {
            let m = progression_multiplier(Some(&Progression {
                successful_days: days,
                current_streak: 0,
                level: 1,
            }));
            assert!(m >= last);
            last = m;
        }
    }

    #[test]
    fn test_gentle_ramp_bounded() {
        for d in 1..=28 {
            let r = gentle_ramp(DateKey::from_ymd(2026, 2, d).expect("date"));
            assert!((1.0..=1.0 + RAMP_CAP).contains(&r));
        }
    }

    #[test]
    fn test_invalid_multiplier_treated_as_one() {
        let date = key("2026-01-20");
        assert_eq!(generate(date, f64::NAN, None), generate(date, 1.0, None));
        assert_eq!(generate(date, -2.0, None), generate(date, 1.0, None));
    }
}
