//! Goal use cases: save, complete, delete and the daily lifecycle sweep.
//!
//! # Invariants
//! - Every goal write is followed by a reminder resync for that goal.
//! - Converted and deleted goals never keep a pending delivery.
//! - A sweep is safe to repeat: converted goals are gone from the goal list,
//!   so the next sweep cannot convert them again.

use super::{ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::engine::goal::{apply_goal_lifecycle, complete_goal};
use crate::model::goal::{EntryId, GoalEntry, GoalState};
use crate::notify::{ReminderService, ReminderSync};
use crate::repo::{LifeStore, RepoError};
use log::info;
use std::sync::Arc;

/// Result of one lifecycle sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Goals replaced by memories in this sweep.
    pub converted: Vec<EntryId>,
    /// Active goals past their target date.
    pub overdue: Vec<EntryId>,
    /// Goals that now have a pending delivery.
    pub scheduled: Vec<EntryId>,
}

/// Facade over goal storage and reminder delivery.
pub struct GoalService {
    store: Arc<dyn LifeStore>,
    reminders: Arc<ReminderService>,
    clock: Arc<dyn Clock>,
}

impl GoalService {
    pub fn new(
        store: Arc<dyn LifeStore>,
        reminders: Arc<ReminderService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            reminders,
            clock,
        }
    }

    /// Persists `goal` and resyncs its reminder.
    pub fn save_goal(&self, user_id: &str, goal: &GoalEntry) -> ServiceResult<ReminderSync> {
        self.store.save_goal(user_id, goal)?;
        Ok(self.reminders.sync_goal(goal, self.clock.today())?)
    }

    /// Marks a goal completed (idempotent) and drops its reminder.
    pub fn complete_goal(&self, user_id: &str, id: EntryId) -> ServiceResult<GoalEntry> {
        let goal = self
            .store
            .load_goal(user_id, id)?
            .ok_or(ServiceError::GoalNotFound(id))?;
        let completed = complete_goal(&goal, self.clock.now_ms());
        if completed != goal {
            self.store.save_goal(user_id, &completed)?;
            info!("event=goal_complete module=service status=ok goal={id}");
        }
        self.reminders.remove_entry(id)?;
        Ok(completed)
    }

    /// Cancels the goal's reminder, then deletes it.
    pub fn delete_goal(&self, user_id: &str, id: EntryId) -> ServiceResult<()> {
        self.reminders.remove_entry(id)?;
        self.store.delete_goal(user_id, id).map_err(|err| match err {
            RepoError::NotFound { .. } => ServiceError::GoalNotFound(id),
            other => ServiceError::Repo(other),
        })
    }

    /// Applies the lifecycle to every goal of `user_id` as of today.
    pub fn sweep(&self, user_id: &str) -> ServiceResult<SweepReport> {
        let today = self.clock.today();
        let mut report = SweepReport::default();

        for goal in self.store.load_goals(user_id)? {
            let evaluation = apply_goal_lifecycle(&goal, today);
            match (evaluation.state, evaluation.converted_memory) {
                (GoalState::ConvertedToMemory, Some(memory)) => {
                    self.store.convert_goal_to_memory(user_id, &memory)?;
                    self.reminders.remove_entry(goal.id)?;
                    report.converted.push(goal.id);
                }
                (GoalState::Completed, _) => {
                    self.reminders.remove_entry(goal.id)?;
                }
                _ => {
                    if evaluation.overdue {
                        report.overdue.push(goal.id);
                    }
                    if let ReminderSync::Scheduled { .. } =
                        self.reminders.sync_goal(&goal, today)?
                    {
                        report.scheduled.push(goal.id);
                    }
                }
            }
        }

        info!(
            "event=goal_sweep module=service status=ok converted={} overdue={} scheduled={}",
            report.converted.len(),
            report.overdue.len(),
            report.scheduled.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::GoalService;
    use crate::clock::FixedClock;
    use crate::model::goal::GoalEntry;
    use crate::model::reminder::{LeadTime, ReminderSpec};
    use crate::notify::{InMemoryNotificationGateway, ReminderService, ReminderSync};
    use crate::repo::{InMemoryLifeStore, LifeStore};
    use crate::service::ServiceError;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    struct Fixture {
        store: Arc<InMemoryLifeStore>,
        gateway: Arc<InMemoryNotificationGateway>,
        service: GoalService,
    }

    fn fixture(today: NaiveDate) -> Fixture {
        let store = Arc::new(InMemoryLifeStore::new());
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        let service = GoalService::new(
            store.clone(),
            Arc::new(ReminderService::new(gateway.clone())),
            Arc::new(FixedClock::new(today, 42)),
        );
        Fixture {
            store,
            gateway,
            service,
        }
    }

    #[test]
    fn save_schedules_and_complete_cancels() {
        let fx = fixture(date(2024, 5, 1));
        let mut goal = GoalEntry::new("Book tickets", date(2024, 5, 10));
        goal.reminder = Some(ReminderSpec::one_time(date(2024, 5, 10), LeadTime::none()));

        let sync = fx.service.save_goal("u1", &goal).expect("save");
        assert!(matches!(sync, ReminderSync::Scheduled { .. }));
        assert_eq!(fx.gateway.pending_count(), 1);

        let done = fx.service.complete_goal("u1", goal.id).expect("complete");
        assert_eq!(done.completed_at_ms, Some(42));
        assert_eq!(fx.gateway.pending_count(), 0);

        let again = fx.service.complete_goal("u1", goal.id).expect("idempotent");
        assert_eq!(again.completed_at_ms, Some(42));
    }

    #[test]
    fn missing_goal_is_reported() {
        let fx = fixture(date(2024, 5, 1));
        assert!(matches!(
            fx.service.complete_goal("u1", Uuid::new_v4()),
            Err(ServiceError::GoalNotFound(_))
        ));
        assert!(matches!(
            fx.service.delete_goal("u1", Uuid::new_v4()),
            Err(ServiceError::GoalNotFound(_))
        ));
    }

    #[test]
    fn sweep_converts_once_and_flags_overdue() {
        let fx = fixture(date(2024, 6, 2));
        let mut convert = GoalEntry::new("Visit Rome", date(2024, 6, 1));
        convert.convert_to_memory_when_passed = true;
        let keep = GoalEntry::new("Call grandma", date(2024, 6, 1));
        fx.store.save_goal("u1", &convert).expect("save");
        fx.store.save_goal("u1", &keep).expect("save");

        let first = fx.service.sweep("u1").expect("sweep");
        assert_eq!(first.converted, vec![convert.id]);
        assert_eq!(first.overdue, vec![keep.id]);

        let second = fx.service.sweep("u1").expect("second sweep");
        assert!(second.converted.is_empty());
        let memories = fx.store.load_memories("u1").expect("memories");
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].id, convert.id);
        assert!(memories[0].converted_from_goal);
    }
}
