//! Reconciliation across all users.

use ascendia_types::{SweepFailure, SweepReport};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::archetypes::ArchetypeLookup;
use crate::daily::reconcile_profile;
use crate::store::Store;
use crate::{EngineConfig, Result};

/// Profiles fetched per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Reconcile every profile page by page.
///
/// A failing user is recorded in the report and the sweep moves on. Failing
/// to read a page aborts the sweep.
pub fn sweep<S: Store + ?Sized>(
    store: &S,
    archetypes: &dyn ArchetypeLookup,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<SweepReport> {
    let page_size = config.sweep_page_size.max(1);
    let mut report = SweepReport::default();
    let mut offset = 0u64;

    loop {
        let page = store.list_profiles_page(offset, page_size)?;
        let fetched = page.len() as u64;

        for profile in page {
            report.processed += 1;
            let user_id = profile.user_id.clone();
            match reconcile_profile(store, archetypes, config, profile, now) {
                Ok(_) => report.reconciled += 1,
                Err(e) => {
                    warn!(%user_id, error = %e, "reconciliation failed");
                    report.errors.push(SweepFailure {
                        user_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        if fetched < page_size {
            break;
        }
        offset += fetched;
    }

    report.ok = report.errors.is_empty();
    info!(
        processed = report.processed,
        reconciled = report.reconciled,
        errors = report.errors.len(),
        "sweep finished"
    );
    Ok(report)
}
