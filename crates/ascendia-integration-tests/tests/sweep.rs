//! Integration test: the all-users reconciliation sweep.
//!
//! 1. Pages through every profile, including a partial last page
//! 2. A failing user is recorded and the sweep continues
//! 3. The report serializes to the `{ok, processed, reconciled, errors}` shape

use ascendia_engine::archetypes::BuiltinArchetypes;
use ascendia_engine::store::{MissionStore, SqliteStore, UserStore};
use ascendia_engine::sweep::sweep;
use ascendia_engine::EngineConfig;
use ascendia_types::{DateKey, MissionStatus, ProfilePatch};
use chrono::{DateTime, TimeZone, Utc};

fn key(s: &str) -> DateKey {
    s.parse().expect("date key")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0)
        .single()
        .expect("instant")
}

fn with_history(store: &SqliteStore<'_>, user_id: &str) {
    store
        .upsert_profile(
            user_id,
            &ProfilePatch {
                current_streak: Some(2),
                longest_streak: Some(2),
                successful_days: Some(2),
                last_success_date: Some(key("2026-01-29")),
                ..ProfilePatch::default()
            },
        )
        .expect("profile");
}

#[test]
fn sweep_pages_through_all_profiles() {
    let conn = ascendia_db::open_memory().expect("open");
    let store = SqliteStore::new(&conn).expect("store");
    for i in 0..7 {
        with_history(&store, &format!("user-{i}"));
    }
    let cfg = EngineConfig {
        sweep_page_size: 3,
        ..EngineConfig::default()
    };

    let report = sweep(&store, &BuiltinArchetypes::default(), &cfg, now()).expect("sweep");
    assert!(report.ok);
    assert_eq!(report.processed, 7);
    assert_eq!(report.reconciled, 7);
    assert!(report.errors.is_empty());

    for i in 0..7 {
        let p = store.get_profile(&format!("user-{i}")).expect("profile");
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.last_reconciled_date, Some(key("2026-01-31")));
        let missed = store
            .list_missions(&p.user_id, key("2026-01-30"))
            .expect("missions");
        assert!(missed.iter().all(|m| m.status == MissionStatus::Failed));
    }

    // A second sweep finds nothing left to do.
    let again = sweep(&store, &BuiltinArchetypes::default(), &cfg, now()).expect("again");
    assert!(again.ok);
    assert_eq!(again.reconciled, 7);
}

#[test]
fn failing_user_does_not_stop_the_sweep() {
    let conn = ascendia_db::open_memory().expect("open");
    let store = SqliteStore::new(&conn).expect("store");
    for user in ["alpha", "broken", "gamma"] {
        with_history(&store, user);
    }
    conn.execute_batch(
        "CREATE TRIGGER reject_broken BEFORE INSERT ON missions
         WHEN NEW.user_id = 'broken'
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .expect("trigger");

    let report = sweep(
        &store,
        &BuiltinArchetypes::default(),
        &EngineConfig::default(),
        now(),
    )
    .expect("sweep");
    assert!(!report.ok);
    assert_eq!(report.processed, 3);
    assert_eq!(report.reconciled, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].user_id, "broken");
    assert!(report.errors[0].message.contains("boom"));

    let untouched = store.get_profile("broken").expect("profile");
    assert_eq!(untouched.current_streak, 2);
    assert_eq!(untouched.last_reconciled_date, None);
    assert_eq!(store.get_profile("gamma").expect("profile").current_streak, 0);

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["ok"], false);
    assert_eq!(json["processed"], 3);
    assert_eq!(json["errors"][0]["user_id"], "broken");
    assert!(json["errors"][0]["message"].is_string());
}
