//! SQL schema definitions.

/// Initial schema.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Archetypes
-- ============================================================

CREATE TABLE IF NOT EXISTS archetypes (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    description TEXT NOT NULL,
    difficulty_multiplier REAL NOT NULL DEFAULT 1.0,
    tone TEXT NOT NULL,
    message_style TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0
);

-- ============================================================
-- Profiles
-- ============================================================

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    email TEXT,
    timezone TEXT NOT NULL DEFAULT 'UTC',
    archetype_id TEXT,
    current_streak INTEGER NOT NULL DEFAULT 0 CHECK (current_streak >= 0),
    longest_streak INTEGER NOT NULL DEFAULT 0 CHECK (longest_streak >= 0),
    level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
    successful_days INTEGER NOT NULL DEFAULT 0,
    total_missions_completed INTEGER NOT NULL DEFAULT 0,
    last_success_date TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- ============================================================
-- Missions
-- ============================================================

CREATE TABLE IF NOT EXISTS missions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES profiles(user_id) ON DELETE CASCADE,
    date_key TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('pushups', 'squats', 'plank', 'crunches', 'run')),
    target_value INTEGER NOT NULL CHECK (target_value > 0),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'completed', 'failed', 'skipped')),
    created_at INTEGER NOT NULL,
    completed_at INTEGER,
    UNIQUE (user_id, date_key, type)
);

CREATE INDEX IF NOT EXISTS idx_missions_user_date ON missions(user_id, date_key);

-- ============================================================
-- Progress log (one row per user per day)
-- ============================================================

CREATE TABLE IF NOT EXISTS progress_log (
    user_id TEXT NOT NULL REFERENCES profiles(user_id) ON DELETE CASCADE,
    date_key TEXT NOT NULL,
    completed_missions INTEGER NOT NULL DEFAULT 0,
    failed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, date_key)
);
"#;

/// Adds the reconciliation watermark.
pub const SCHEMA_V2: &str = r#"
ALTER TABLE profiles ADD COLUMN last_reconciled_date TEXT;
"#;
