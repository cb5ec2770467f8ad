//! Recurring reminder trigger computation.
//!
//! # Responsibility
//! - Compute the next trigger date of a reminder spec after a reference date.
//! - Build yearly reminder specs for special dates.
//!
//! # Invariants
//! - Instance `k` is always `target + k * frequency`, computed from the
//!   original target so month-end clamping never drifts (Jan 31 monthly
//!   yields Feb 29, Mar 31, Apr 30, ...).
//! - A trigger is `instance - lead_time` using calendar semantics and is
//!   returned only when strictly after the reference date.
//! - Output is deterministic for identical `(spec, after)`; callers recompute
//!   instead of patching schedules.

use crate::calendar::{
    add_interval, date_parts, days_between, months_between, subtract_interval, CalendarInterval,
};
use crate::engine::countdown::next_occurrence_date;
use crate::engine::occurrence::matches;
use crate::model::reminder::{LeadTime, ReminderFrequency, ReminderSpec};
use crate::model::special_date::SpecialDateRecord;
use chrono::NaiveDate;

/// Next trigger date strictly after `after`, or `None` when the reminder
/// has nothing left to fire.
///
/// # Contract
/// - One-shot specs have a single trigger `target - lead_time`.
/// - Recurring specs walk instances from the original target; the series
///   ends at the first instance falling after `end_date`.
pub fn next_reminder_trigger(spec: &ReminderSpec, after: NaiveDate) -> Option<NaiveDate> {
    let lead = spec.lead_time.interval();
    let step_interval = match (spec.is_recurring, spec.frequency.interval()) {
        (true, Some(interval)) => interval,
        _ => {
            let trigger = subtract_interval(spec.target, lead)?;
            return (trigger > after).then_some(trigger);
        }
    };

    let mut step = first_candidate_step(spec.target, step_interval, after);
    loop {
        let instance = add_interval(spec.target, step_interval.times(step)?)?;
        if spec.end_date.is_some_and(|end| instance > end) {
            return None;
        }
        let trigger = subtract_interval(instance, lead)?;
        if trigger > after {
            return Some(trigger);
        }
        step = step.checked_add(1)?;
    }
}

/// Returns whether the reminder will never fire again after `after`.
pub fn is_series_expired(spec: &ReminderSpec, after: NaiveDate) -> bool {
    next_reminder_trigger(spec, after).is_none()
}

/// Up to `limit` upcoming trigger dates after `after`, ascending.
pub fn trigger_preview(spec: &ReminderSpec, after: NaiveDate, limit: usize) -> Vec<NaiveDate> {
    let mut triggers = Vec::with_capacity(limit);
    let mut cursor = after;
    while triggers.len() < limit {
        match next_reminder_trigger(spec, cursor) {
            Some(trigger) => {
                triggers.push(trigger);
                cursor = trigger;
            }
            None => break,
        }
    }
    triggers
}

/// Yearly reminder for a special date, targeting its next real occurrence.
///
/// One-time records get a one-shot reminder; a one-time record whose date
/// has passed gets none.
pub fn reminder_for_special_date(
    record: &SpecialDateRecord,
    lead_time: LeadTime,
    today: NaiveDate,
) -> Option<ReminderSpec> {
    let target = next_occurrence_date(record, today)?;
    if !matches(record, target) {
        return None;
    }
    let spec = if record.is_recurring {
        ReminderSpec::recurring(target, ReminderFrequency::Yearly, lead_time, None).ok()?
    } else {
        ReminderSpec::one_time(target, lead_time)
    };
    Some(spec.with_origin(record.id))
}

// Skips instances that are on or before `after`: their triggers cannot be
// strictly after it because lead times are non-negative.
fn first_candidate_step(target: NaiveDate, interval: CalendarInterval, after: NaiveDate) -> u32 {
    let raw = match interval {
        CalendarInterval::Days(n) => days_between(target, after) / i64::from(n.max(1)),
        CalendarInterval::Weeks(n) => days_between(target, after) / (i64::from(n.max(1)) * 7),
        CalendarInterval::Months(n) => (months_between(target, after) - 1) / i64::from(n.max(1)),
        CalendarInterval::Years(n) => {
            i64::from(date_parts(after).year - date_parts(target).year - 1) / i64::from(n.max(1))
        }
    };
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}
