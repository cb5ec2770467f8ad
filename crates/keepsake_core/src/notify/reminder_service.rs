//! Keeps platform deliveries in step with goal reminders.

use super::{NotificationGateway, NotificationHandle, NotificationRequest, NotifyError};
use crate::engine::reminder::next_reminder_trigger;
use crate::model::goal::{EntryId, GoalEntry};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of one reminder sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderSync {
    Scheduled {
        handle: NotificationHandle,
        trigger_date: NaiveDate,
    },
    /// Goal has no reminder or is completed.
    NoReminder,
    /// The series has nothing left to fire.
    Expired,
    /// A trigger exists but the user has not allowed notifications.
    NotAuthorized { trigger_date: NaiveDate },
}

/// One pending delivery per journal entry.
pub struct ReminderService {
    gateway: Arc<dyn NotificationGateway>,
    handles: Mutex<HashMap<EntryId, NotificationHandle>>,
}

impl ReminderService {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            gateway,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Cancels the goal's current delivery and schedules the recomputed one.
    ///
    /// Triggers falling on `today` are still scheduled.
    pub fn sync_goal(
        &self,
        goal: &GoalEntry,
        today: NaiveDate,
    ) -> Result<ReminderSync, NotifyError> {
        let mut handles = self.lock()?;
        self.cancel_existing(&mut handles, goal.id)?;

        let spec = match (&goal.reminder, goal.completed) {
            (Some(spec), false) => spec,
            _ => return Ok(ReminderSync::NoReminder),
        };
        let after = today.pred_opt().unwrap_or(today);
        let Some(trigger_date) = next_reminder_trigger(spec, after) else {
            return Ok(ReminderSync::Expired);
        };
        if !self.gateway.authorization().allows_delivery() {
            info!(
                "event=reminder_sync module=notify status=skipped reason=not_authorized entry={}",
                goal.id
            );
            return Ok(ReminderSync::NotAuthorized { trigger_date });
        }

        let handle = self.gateway.schedule(NotificationRequest {
            entry_id: goal.id,
            trigger_date,
            title: goal.title.clone(),
            body: goal.notes.clone(),
        })?;
        info!(
            "event=reminder_sync module=notify status=ok entry={} trigger={trigger_date}",
            goal.id
        );
        handles.insert(goal.id, handle.clone());
        Ok(ReminderSync::Scheduled {
            handle,
            trigger_date,
        })
    }

    /// Cancels the entry's delivery, if any. Returns whether one existed.
    pub fn remove_entry(&self, entry_id: EntryId) -> Result<bool, NotifyError> {
        let mut handles = self.lock()?;
        self.cancel_existing(&mut handles, entry_id)
    }

    pub fn handle_for(&self, entry_id: EntryId) -> Option<NotificationHandle> {
        self.lock()
            .ok()
            .and_then(|handles| handles.get(&entry_id).cloned())
    }

    fn cancel_existing(
        &self,
        handles: &mut HashMap<EntryId, NotificationHandle>,
        entry_id: EntryId,
    ) -> Result<bool, NotifyError> {
        let Some(handle) = handles.remove(&entry_id) else {
            return Ok(false);
        };
        match self.gateway.cancel(&handle) {
            Ok(()) => Ok(true),
            // Already delivered or dropped by the platform.
            Err(NotifyError::UnknownHandle(_)) => {
                warn!("event=reminder_cancel module=notify status=stale entry={entry_id}");
                Ok(true)
            }
            Err(err) => {
                handles.insert(entry_id, handle);
                Err(err)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<EntryId, NotificationHandle>>, NotifyError> {
        self.handles
            .lock()
            .map_err(|_| NotifyError::Platform("reminder handle table poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ReminderService, ReminderSync};
    use crate::model::goal::GoalEntry;
    use crate::model::reminder::{LeadTime, LeadTimeUnit, ReminderFrequency, ReminderSpec};
    use crate::notify::{AuthorizationState, InMemoryNotificationGateway};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn weekly_goal() -> GoalEntry {
        let mut goal = GoalEntry::new("Water plants", date(2024, 5, 6));
        goal.reminder = Some(
            ReminderSpec::recurring(
                date(2024, 5, 6),
                ReminderFrequency::Weekly,
                LeadTime::new(1, LeadTimeUnit::Days).expect("lead"),
                None,
            )
            .expect("spec"),
        );
        goal
    }

    #[test]
    fn resync_cancels_previous_delivery() {
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        let service = ReminderService::new(gateway.clone());
        let goal = weekly_goal();

        let first = service.sync_goal(&goal, date(2024, 5, 1)).expect("sync");
        assert!(matches!(
            first,
            ReminderSync::Scheduled { trigger_date, .. } if trigger_date == date(2024, 5, 5)
        ));
        let second = service.sync_goal(&goal, date(2024, 5, 6)).expect("resync");
        assert!(matches!(
            second,
            ReminderSync::Scheduled { trigger_date, .. } if trigger_date == date(2024, 5, 12)
        ));
        assert_eq!(gateway.pending_count(), 1);

        assert!(service.remove_entry(goal.id).expect("remove"));
        assert!(!service.remove_entry(goal.id).expect("second remove"));
        assert_eq!(gateway.pending_count(), 0);
    }

    #[test]
    fn trigger_today_is_still_scheduled() {
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        let service = ReminderService::new(gateway);
        let sync = service
            .sync_goal(&weekly_goal(), date(2024, 5, 5))
            .expect("sync");
        assert!(matches!(
            sync,
            ReminderSync::Scheduled { trigger_date, .. } if trigger_date == date(2024, 5, 5)
        ));
    }

    #[test]
    fn denied_authorization_schedules_nothing() {
        let gateway = Arc::new(InMemoryNotificationGateway::with_authorization(
            AuthorizationState::Denied,
        ));
        let service = ReminderService::new(gateway.clone());
        let sync = service
            .sync_goal(&weekly_goal(), date(2024, 5, 1))
            .expect("sync");
        assert_eq!(
            sync,
            ReminderSync::NotAuthorized {
                trigger_date: date(2024, 5, 5)
            }
        );
        assert_eq!(gateway.pending_count(), 0);
    }

    #[test]
    fn completed_goal_clears_delivery() {
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        let service = ReminderService::new(gateway.clone());
        let mut goal = weekly_goal();
        service.sync_goal(&goal, date(2024, 5, 1)).expect("sync");

        goal.completed = true;
        goal.completed_at_ms = Some(1);
        assert_eq!(
            service.sync_goal(&goal, date(2024, 5, 2)).expect("resync"),
            ReminderSync::NoReminder
        );
        assert_eq!(gateway.pending_count(), 0);
        assert!(service.handle_for(goal.id).is_none());
    }

    #[test]
    fn delivered_handle_is_tolerated_on_cancel() {
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        let service = ReminderService::new(gateway.clone());
        let goal = weekly_goal();
        service.sync_goal(&goal, date(2024, 5, 1)).expect("sync");
        let handle = service.handle_for(goal.id).expect("handle");
        crate::notify::NotificationGateway::cancel(gateway.as_ref(), &handle)
            .expect("platform delivers");

        assert!(service.remove_entry(goal.id).expect("stale cancel tolerated"));
    }
}
