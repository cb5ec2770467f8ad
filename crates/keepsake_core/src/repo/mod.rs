//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the keyed load/save/delete contract the services consume.
//! - Provide SQLite and in-memory implementations of that contract.
//!
//! # Invariants
//! - Every record is scoped by a non-blank user ID.
//! - Write paths validate records before persisting them.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Absent and empty optional strings stay distinct (`NULL` vs `''`).

use crate::db::DbError;
use crate::model::goal::{EntryId, GoalEntry, GoalValidationError, MemoryEntry};
use crate::model::profile::BiographicalProfile;
use crate::model::special_date::{
    CustomSpecialDate, SpecialDateId, SpecialDateStore, SpecialDateValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

mod journal_repo;
mod profile_repo;
mod special_date_repo;

pub use memory_store::InMemoryLifeStore;
pub use sqlite_store::SqliteLifeStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by all store implementations.
#[derive(Debug)]
pub enum RepoError {
    InvalidUserId,
    SpecialDate(SpecialDateValidationError),
    Goal(GoalValidationError),
    Db(DbError),
    NotFound { kind: &'static str, id: String },
    InvalidData(String),
    LockPoisoned(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserId => write!(f, "user id must not be empty"),
            Self::SpecialDate(err) => write!(f, "{err}"),
            Self::Goal(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::LockPoisoned(resource) => write!(f, "store lock poisoned: {resource}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SpecialDate(err) => Some(err),
            Self::Goal(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SpecialDateValidationError> for RepoError {
    fn from(value: SpecialDateValidationError) -> Self {
        Self::SpecialDate(value)
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::Goal(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed persistence contract for one storage provider.
///
/// Implementations are selected once at startup (see `storage`), so callers
/// never inspect concrete provider types.
pub trait LifeStore: Send + Sync {
    /// Stable provider ID (`[a-z0-9_-]+`).
    fn provider_id(&self) -> &str;

    fn load_profile(&self, user_id: &str) -> RepoResult<Option<BiographicalProfile>>;
    fn save_profile(&self, user_id: &str, profile: &BiographicalProfile) -> RepoResult<()>;

    fn load_custom_dates(&self, user_id: &str) -> RepoResult<SpecialDateStore>;
    fn save_custom_date(&self, user_id: &str, date: &CustomSpecialDate) -> RepoResult<()>;
    fn delete_custom_date(&self, user_id: &str, id: SpecialDateId) -> RepoResult<()>;

    fn load_goals(&self, user_id: &str) -> RepoResult<Vec<GoalEntry>>;
    fn load_goal(&self, user_id: &str, id: EntryId) -> RepoResult<Option<GoalEntry>>;
    fn save_goal(&self, user_id: &str, goal: &GoalEntry) -> RepoResult<()>;
    fn delete_goal(&self, user_id: &str, id: EntryId) -> RepoResult<()>;

    /// Replaces goal `memory.id` with `memory` atomically.
    fn convert_goal_to_memory(&self, user_id: &str, memory: &MemoryEntry) -> RepoResult<()>;
    fn load_memories(&self, user_id: &str) -> RepoResult<Vec<MemoryEntry>>;
}

pub(crate) fn require_user_id(user_id: &str) -> RepoResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidUserId);
    }
    Ok(trimmed)
}
