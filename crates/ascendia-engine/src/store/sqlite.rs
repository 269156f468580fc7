//! SQLite-backed store adapters.

use std::time::{SystemTime, UNIX_EPOCH};

use ascendia_db::queries::{archetypes, missions, profiles, progress};
use ascendia_db::{DbError, SchemaCaps};
use ascendia_types::{
    Archetype, DateKey, Mission, MissionStatus, NewMission, Profile, ProfilePatch,
    ProgressLogEntry,
};
use rusqlite::Connection;

use super::{MissionStore, ProgressLogStore, UserStore};
use crate::archetypes::{ArchetypeLookup, BuiltinArchetypes};
use crate::Result;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Store over a borrowed connection, with schema capabilities detected once.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
    caps: SchemaCaps,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Result<Self> {
        let caps = SchemaCaps::detect(conn)?;
        Ok(Self { conn, caps })
    }

    pub fn with_caps(conn: &'c Connection, caps: SchemaCaps) -> Self {
        Self { conn, caps }
    }

    pub fn caps(&self) -> SchemaCaps {
        self.caps
    }
}

impl UserStore for SqliteStore<'_> {
    fn supports_watermark(&self) -> bool {
        self.caps.reconcile_watermark
    }

    fn get_profile(&self, user_id: &str) -> Result<Profile> {
        Ok(profiles::get(self.conn, &self.caps, user_id)?)
    }

    fn upsert_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<Profile> {
        Ok(profiles::upsert(
            self.conn,
            &self.caps,
            user_id,
            patch,
            now_secs(),
        )?)
    }

    fn list_profiles_page(&self, offset: u64, limit: u64) -> Result<Vec<Profile>> {
        Ok(profiles::list_page(self.conn, &self.caps, offset, limit)?)
    }

    fn delete_profile(&self, user_id: &str) -> Result<bool> {
        Ok(profiles::delete(self.conn, user_id)?)
    }
}

impl MissionStore for SqliteStore<'_> {
    fn list_missions(&self, user_id: &str, date_key: DateKey) -> Result<Vec<Mission>> {
        Ok(missions::list(self.conn, user_id, date_key)?)
    }

    fn list_missions_between(
        &self,
        user_id: &str,
        from: DateKey,
        to: DateKey,
    ) -> Result<Vec<Mission>> {
        Ok(missions::list_between(self.conn, user_id, from, to)?)
    }

    fn get_mission(&self, mission_id: &str, user_id: &str) -> Result<Mission> {
        Ok(missions::get(self.conn, mission_id, user_id)?)
    }

    fn upsert_missions(
        &self,
        user_id: &str,
        date_key: DateKey,
        new: &[NewMission],
    ) -> Result<Vec<Mission>> {
        Ok(missions::upsert(
            self.conn,
            user_id,
            date_key,
            new,
            now_secs(),
        )?)
    }

    fn update_mission_status(
        &self,
        mission_id: &str,
        user_id: &str,
        status: MissionStatus,
        completed_at: Option<u64>,
    ) -> Result<bool> {
        Ok(missions::update_status(
            self.conn,
            mission_id,
            user_id,
            status,
            completed_at,
        )?)
    }

    fn bulk_update_status(
        &self,
        ids: &[String],
        user_id: &str,
        status: MissionStatus,
    ) -> Result<usize> {
        Ok(missions::bulk_update_status(self.conn, ids, user_id, status)?)
    }
}

impl ProgressLogStore for SqliteStore<'_> {
    fn upsert_progress_log(
        &self,
        user_id: &str,
        date_key: DateKey,
        completed_missions: u32,
        failed: bool,
    ) -> Result<()> {
        let entry = ProgressLogEntry {
            user_id: user_id.to_string(),
            date_key,
            completed_missions,
            failed,
        };
        Ok(progress::upsert(self.conn, &entry, now_secs())?)
    }
}

/// Archetypes from the `archetypes` table, or the built-in table when it is missing.
pub struct SqliteArchetypes<'c> {
    conn: &'c Connection,
    fallback: BuiltinArchetypes,
}

impl<'c> SqliteArchetypes<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            fallback: BuiltinArchetypes::default(),
        }
    }
}

impl ArchetypeLookup for SqliteArchetypes<'_> {
    fn list(&self) -> Result<Vec<Archetype>> {
        match archetypes::list(self.conn) {
            Ok(rows) => Ok(rows),
            Err(DbError::SchemaUnavailable(what)) => {
                tracing::debug!(%what, "archetype table missing; serving built-ins");
                self.fallback.list()
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find(&self, id: &str) -> Result<Option<Archetype>> {
        match archetypes::get(self.conn, id) {
            Ok(row) => Ok(row),
            Err(DbError::SchemaUnavailable(_)) => self.fallback.find(id),
            Err(e) => Err(e.into()),
        }
    }
}
