//! Periodic reconciliation sweep.
//!
//! Runs the all-users sweep on a fixed interval so that users who never open
//! the app still have their closed days settled.

use std::sync::Arc;
use std::time::Duration;

use ascendia_engine::store::{SqliteArchetypes, SqliteStore};
use ascendia_engine::sweep;
use ascendia_types::SweepReport;
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::DaemonState;

/// Lower bound on the sweep interval.
pub const MIN_INTERVAL_SECS: u64 = 60;

/// Sweep interval from config, never shorter than [`MIN_INTERVAL_SECS`].
pub fn sweep_interval(interval_minutes: u64) -> Duration {
    Duration::from_secs(interval_minutes.saturating_mul(60).max(MIN_INTERVAL_SECS))
}

/// Run one sweep with the connection locked.
pub async fn run_sweep_once(state: &Arc<DaemonState>) -> ascendia_engine::Result<SweepReport> {
    let db = state.db.lock().await;
    let store = SqliteStore::with_caps(&db, state.caps);
    let archetypes = SqliteArchetypes::new(&db);
    sweep::sweep(&store, &archetypes, &state.engine, Utc::now())
}

/// Sweep forever on the configured interval. The first tick fires immediately.
pub async fn run(state: Arc<DaemonState>) {
    let period = sweep_interval(state.config.sweep.interval_minutes);
    info!(?period, "Sweep scheduler started");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match run_sweep_once(&state).await {
            Ok(report) if report.ok => {}
            Ok(report) => warn!(
                failed = report.errors.len(),
                processed = report.processed,
                "Sweep finished with failures"
            ),
            Err(e) => error!("Sweep aborted: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DaemonConfig;
    use ascendia_engine::store::UserStore;
    use ascendia_types::ProfilePatch;

    #[test]
    fn test_sweep_interval_bounds() {
        assert_eq!(sweep_interval(0), Duration::from_secs(MIN_INTERVAL_SECS));
        assert_eq!(sweep_interval(60), Duration::from_secs(3600));
        assert_eq!(sweep_interval(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[tokio::test]
    async fn test_run_sweep_once_reconciles_profiles() {
        let conn = ascendia_db::open_memory().expect("open");
        let state = Arc::new(DaemonState::new(conn, DaemonConfig::default()).expect("state"));
        {
            let db = state.db.lock().await;
            let store = SqliteStore::with_caps(&db, state.caps);
            store
                .upsert_profile("u1", &ProfilePatch::default())
                .expect("profile");
        }
        let report = run_sweep_once(&state).await.expect("sweep");
        assert!(report.ok);
        assert_eq!(report.processed, 1);
        assert_eq!(report.reconciled, 1);
    }
}
