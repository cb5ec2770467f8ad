//! In-process `LifeStore` provider.
//!
//! Mirrors the SQLite provider's semantics (ownership checks, completion
//! guard, validation) without touching disk.

use super::{require_user_id, LifeStore, RepoError, RepoResult};
use crate::model::goal::{EntryId, GoalEntry, MemoryEntry};
use crate::model::profile::BiographicalProfile;
use crate::model::special_date::{CustomSpecialDate, SpecialDateId, SpecialDateStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

pub const MEMORY_PROVIDER_ID: &str = "memory";

#[derive(Debug, Default)]
struct UserRecords {
    profile: Option<BiographicalProfile>,
    custom_dates: SpecialDateStore,
    goals: BTreeMap<EntryId, GoalEntry>,
    memories: BTreeMap<EntryId, MemoryEntry>,
}

/// Volatile storage provider.
#[derive(Debug, Default)]
pub struct InMemoryLifeStore {
    users: Mutex<HashMap<String, UserRecords>>,
}

impl InMemoryLifeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, HashMap<String, UserRecords>>> {
        self.users
            .lock()
            .map_err(|_| RepoError::LockPoisoned("memory store"))
    }

    fn with_user<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut UserRecords) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let user_id = require_user_id(user_id)?;
        let mut users = self.lock()?;
        f(users.entry(user_id.to_string()).or_default())
    }

    fn owner_of_goal(users: &HashMap<String, UserRecords>, id: EntryId) -> Option<&str> {
        users
            .iter()
            .find(|(_, records)| records.goals.contains_key(&id))
            .map(|(owner, _)| owner.as_str())
    }
}

impl LifeStore for InMemoryLifeStore {
    fn provider_id(&self) -> &str {
        MEMORY_PROVIDER_ID
    }

    fn load_profile(&self, user_id: &str) -> RepoResult<Option<BiographicalProfile>> {
        self.with_user(user_id, |records| Ok(records.profile.clone()))
    }

    fn save_profile(&self, user_id: &str, profile: &BiographicalProfile) -> RepoResult<()> {
        self.with_user(user_id, |records| {
            records.profile = Some(profile.clone());
            Ok(())
        })
    }

    fn load_custom_dates(&self, user_id: &str) -> RepoResult<SpecialDateStore> {
        self.with_user(user_id, |records| Ok(records.custom_dates.clone()))
    }

    fn save_custom_date(&self, user_id: &str, date: &CustomSpecialDate) -> RepoResult<()> {
        date.validate()?;
        let user_id = require_user_id(user_id)?;
        let mut users = self.lock()?;
        let foreign = users
            .iter()
            .any(|(owner, records)| owner != user_id && records.custom_dates.get(date.id).is_some());
        if foreign {
            return Err(RepoError::NotFound {
                kind: "special date",
                id: date.id.to_string(),
            });
        }
        users
            .entry(user_id.to_string())
            .or_default()
            .custom_dates
            .upsert(date.clone())
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        Ok(())
    }

    fn delete_custom_date(&self, user_id: &str, id: SpecialDateId) -> RepoResult<()> {
        self.with_user(user_id, |records| {
            records
                .custom_dates
                .remove(id)
                .map(|_| ())
                .ok_or(RepoError::NotFound {
                    kind: "special date",
                    id: id.to_string(),
                })
        })
    }

    fn load_goals(&self, user_id: &str) -> RepoResult<Vec<GoalEntry>> {
        self.with_user(user_id, |records| {
            let mut goals: Vec<GoalEntry> = records.goals.values().cloned().collect();
            goals.sort_by(|left, right| {
                left.target_date
                    .cmp(&right.target_date)
                    .then_with(|| left.id.cmp(&right.id))
            });
            Ok(goals)
        })
    }

    fn load_goal(&self, user_id: &str, id: EntryId) -> RepoResult<Option<GoalEntry>> {
        self.with_user(user_id, |records| Ok(records.goals.get(&id).cloned()))
    }

    fn save_goal(&self, user_id: &str, goal: &GoalEntry) -> RepoResult<()> {
        goal.validate()?;
        let user_id = require_user_id(user_id)?;
        let mut users = self.lock()?;
        if Self::owner_of_goal(&users, goal.id).is_some_and(|owner| owner != user_id) {
            return Err(RepoError::InvalidData(format!(
                "goal {} is owned by another user or already completed",
                goal.id
            )));
        }

        let records = users.entry(user_id.to_string()).or_default();
        let mut stored = goal.clone();
        if let Some(existing) = records.goals.get(&goal.id) {
            if existing.completed && !goal.completed {
                return Err(RepoError::InvalidData(format!(
                    "goal {} is owned by another user or already completed",
                    goal.id
                )));
            }
            if existing.completed_at_ms.is_some() {
                stored.completed_at_ms = existing.completed_at_ms;
            }
        }
        records.goals.insert(goal.id, stored);
        Ok(())
    }

    fn delete_goal(&self, user_id: &str, id: EntryId) -> RepoResult<()> {
        self.with_user(user_id, |records| {
            records
                .goals
                .remove(&id)
                .map(|_| ())
                .ok_or(RepoError::NotFound {
                    kind: "goal",
                    id: id.to_string(),
                })
        })
    }

    fn convert_goal_to_memory(&self, user_id: &str, memory: &MemoryEntry) -> RepoResult<()> {
        self.with_user(user_id, |records| {
            if records.goals.remove(&memory.id).is_none() {
                return Err(RepoError::NotFound {
                    kind: "goal",
                    id: memory.id.to_string(),
                });
            }
            records.memories.insert(memory.id, memory.clone());
            Ok(())
        })
    }

    fn load_memories(&self, user_id: &str) -> RepoResult<Vec<MemoryEntry>> {
        self.with_user(user_id, |records| {
            let mut memories: Vec<MemoryEntry> = records.memories.values().cloned().collect();
            memories.sort_by(|left, right| {
                right
                    .date
                    .cmp(&left.date)
                    .then_with(|| left.id.cmp(&right.id))
            });
            Ok(memories)
        })
    }
}
