//! SQLite-backed `LifeStore` provider.
//!
//! # Invariants
//! - The connection is migrated before the store is constructed.
//! - One connection is shared behind a mutex; every call holds it for the
//!   duration of one statement or transaction.

use super::{
    journal_repo, profile_repo, require_user_id, special_date_repo, LifeStore, RepoError,
    RepoResult,
};
use crate::db::{open_db, open_db_in_memory};
use crate::model::goal::{EntryId, GoalEntry, MemoryEntry};
use crate::model::profile::BiographicalProfile;
use crate::model::special_date::{CustomSpecialDate, SpecialDateId, SpecialDateStore};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub const SQLITE_PROVIDER_ID: &str = "sqlite";

/// SQLite storage provider.
pub struct SqliteLifeStore {
    conn: Mutex<Connection>,
}

impl SqliteLifeStore {
    /// Wraps an already migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::LockPoisoned("sqlite connection"))
    }
}

impl LifeStore for SqliteLifeStore {
    fn provider_id(&self) -> &str {
        SQLITE_PROVIDER_ID
    }

    fn load_profile(&self, user_id: &str) -> RepoResult<Option<BiographicalProfile>> {
        let user_id = require_user_id(user_id)?;
        profile_repo::load_profile(&*self.lock()?, user_id)
    }

    fn save_profile(&self, user_id: &str, profile: &BiographicalProfile) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        profile_repo::save_profile(&mut *self.lock()?, user_id, profile)
    }

    fn load_custom_dates(&self, user_id: &str) -> RepoResult<SpecialDateStore> {
        let user_id = require_user_id(user_id)?;
        special_date_repo::load_custom_dates(&*self.lock()?, user_id)
    }

    fn save_custom_date(&self, user_id: &str, date: &CustomSpecialDate) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        special_date_repo::save_custom_date(&*self.lock()?, user_id, date)
    }

    fn delete_custom_date(&self, user_id: &str, id: SpecialDateId) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        special_date_repo::delete_custom_date(&*self.lock()?, user_id, id)
    }

    fn load_goals(&self, user_id: &str) -> RepoResult<Vec<GoalEntry>> {
        let user_id = require_user_id(user_id)?;
        journal_repo::load_goals(&*self.lock()?, user_id)
    }

    fn load_goal(&self, user_id: &str, id: EntryId) -> RepoResult<Option<GoalEntry>> {
        let user_id = require_user_id(user_id)?;
        journal_repo::load_goal(&*self.lock()?, user_id, id)
    }

    fn save_goal(&self, user_id: &str, goal: &GoalEntry) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        journal_repo::save_goal(&*self.lock()?, user_id, goal)
    }

    fn delete_goal(&self, user_id: &str, id: EntryId) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        journal_repo::delete_goal(&*self.lock()?, user_id, id)
    }

    fn convert_goal_to_memory(&self, user_id: &str, memory: &MemoryEntry) -> RepoResult<()> {
        let user_id = require_user_id(user_id)?;
        journal_repo::convert_goal_to_memory(&mut *self.lock()?, user_id, memory)
    }

    fn load_memories(&self, user_id: &str) -> RepoResult<Vec<MemoryEntry>> {
        let user_id = require_user_id(user_id)?;
        journal_repo::load_memories(&*self.lock()?, user_id)
    }
}
