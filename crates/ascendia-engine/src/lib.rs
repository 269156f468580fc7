//! # ascendia-engine
//!
//! Day reconciliation and progression engine.
//!
//! Given a user's history, the engine replays every closed day in ascending
//! order, generating missions where none exist, failing incomplete days,
//! advancing streaks and levels exactly once per day, and finally moving the
//! `last_reconciled_date` watermark to yesterday. Every mutation is guarded by
//! an equality check against persisted state, so re-running is a no-op.
//!
//! ## Modules
//!
//! - [`calendar`]: date keys in user timezones, day arithmetic
//! - [`generator`]: deterministic daily mission generation
//! - [`progression`]: streak/level transitions and difficulty scaling
//! - [`reconcile`]: catch-up walk over unvisited days
//! - [`completion`]: marking a mission complete
//! - [`daily`]: request-scoped operations (today, rollup, profile)
//! - [`sweep`]: reconciliation across all users
//! - [`store`]: storage collaborator traits and their SQLite adapters
//! - [`archetypes`]: archetype lookup with a built-in default table

pub mod archetypes;
pub mod calendar;
pub mod completion;
pub mod daily;
pub mod generator;
pub mod progression;
pub mod reconcile;
pub mod store;
pub mod sweep;

use ascendia_db::DbError;
use ascendia_types::DEFAULT_LEVEL_UP_EVERY_DAYS;

/// Engine error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Referenced mission or profile does not exist for this user.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage reports a missing table or column.
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),

    /// Any other storage failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Input rejected before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => EngineError::NotFound(what),
            DbError::SchemaUnavailable(what) => EngineError::SchemaUnavailable(what),
            other => EngineError::Storage(other.to_string()),
        }
    }
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Process-wide engine settings, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Successful days per level.
    pub level_up_every_days: u32,
    /// Requested missions per day (clamped by the generator).
    pub missions_per_day: usize,
    /// Profiles fetched per sweep page.
    pub sweep_page_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            level_up_every_days: DEFAULT_LEVEL_UP_EVERY_DAYS,
            missions_per_day: generator::DEFAULT_MISSION_COUNT,
            sweep_page_size: sweep::DEFAULT_PAGE_SIZE,
        }
    }
}

impl EngineConfig {
    /// Default settings with a custom level-up interval.
    pub fn with_level_up_every_days(level_up_every_days: u32) -> Result<Self> {
        if level_up_every_days == 0 {
            return Err(EngineError::Validation(
                "level_up_every_days must be positive".into(),
            ));
        }
        Ok(Self {
            level_up_every_days,
            ..Self::default()
        })
    }
}
