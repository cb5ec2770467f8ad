//! Special-date use cases.
//!
//! # Invariants
//! - The record list is always `derive(profile)` followed by the user's
//!   custom dates, deduplicated by ID; nothing derived is persisted.
//! - A user without a profile still sees their custom dates.

use super::{ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::engine::countdown::{self, Countdown};
use crate::engine::derive::derive_special_dates;
use crate::engine::merge::merge_with_store;
use crate::engine::occurrence::matching_on;
use crate::engine::reminder::reminder_for_special_date;
use crate::model::profile::BiographicalProfile;
use crate::model::reminder::{LeadTime, ReminderSpec};
use crate::model::special_date::{CustomSpecialDate, SpecialDateId, SpecialDateRecord};
use crate::repo::LifeStore;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

/// Owned upcoming-list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingDate {
    pub record: SpecialDateRecord,
    pub date: NaiveDate,
    pub days_until: u32,
    pub countdown: Countdown,
}

/// Facade over profile and custom-date storage.
pub struct SpecialDateService {
    store: Arc<dyn LifeStore>,
    clock: Arc<dyn Clock>,
}

impl SpecialDateService {
    pub fn new(store: Arc<dyn LifeStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn save_profile(&self, user_id: &str, profile: &BiographicalProfile) -> ServiceResult<()> {
        Ok(self.store.save_profile(user_id, profile)?)
    }

    pub fn save_custom_date(&self, user_id: &str, date: &CustomSpecialDate) -> ServiceResult<()> {
        Ok(self.store.save_custom_date(user_id, date)?)
    }

    pub fn delete_custom_date(&self, user_id: &str, id: SpecialDateId) -> ServiceResult<()> {
        Ok(self.store.delete_custom_date(user_id, id)?)
    }

    /// Derived and custom records for `user_id`, merged.
    pub fn records_for(&self, user_id: &str) -> ServiceResult<Vec<SpecialDateRecord>> {
        let derived = self
            .store
            .load_profile(user_id)?
            .map(|profile| derive_special_dates(&profile))
            .unwrap_or_default();
        let custom = self.store.load_custom_dates(user_id)?;
        let merged = merge_with_store(derived, &custom);
        debug!(
            "event=special_dates_load module=service status=ok records={}",
            merged.len()
        );
        Ok(merged)
    }

    /// Records occurring on the clock's today.
    pub fn today_matches(&self, user_id: &str) -> ServiceResult<Vec<SpecialDateRecord>> {
        let records = self.records_for(user_id)?;
        Ok(matching_on(&records, self.clock.today())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Records occurring within `window_days` of today, nearest first.
    pub fn upcoming(&self, user_id: &str, window_days: u32) -> ServiceResult<Vec<UpcomingDate>> {
        let records = self.records_for(user_id)?;
        Ok(countdown::upcoming(&records, self.clock.today(), window_days)
            .into_iter()
            .map(|item| UpcomingDate {
                record: item.record.clone(),
                date: item.date,
                days_until: item.days_until,
                countdown: item.countdown,
            })
            .collect())
    }

    /// Suggested reminder for one record, or `None` when it will not occur
    /// again.
    pub fn reminder_for(
        &self,
        user_id: &str,
        id: SpecialDateId,
        lead_time: LeadTime,
    ) -> ServiceResult<Option<ReminderSpec>> {
        let records = self.records_for(user_id)?;
        let record = records
            .iter()
            .find(|record| record.id == id)
            .ok_or(ServiceError::SpecialDateNotFound(id))?;
        Ok(reminder_for_special_date(record, lead_time, self.clock.today()))
    }
}
