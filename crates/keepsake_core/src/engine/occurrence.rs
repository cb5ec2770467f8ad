//! Occurrence matching for special dates.
//!
//! # Responsibility
//! - Decide whether a record occurs on a given date.
//! - Select every record occurring on a given date.
//!
//! # Invariants
//! - Recurring: same month/day and `date.year >= anchor.year`.
//! - One-time: exact calendar-day equality with the anchor.
//! - Feb 29 anchors never match a non-leap year; no rounding to Mar 1.

use crate::calendar::{date_parts, same_month_day};
use crate::model::special_date::SpecialDateRecord;
use chrono::NaiveDate;

/// Returns whether `record` occurs on `date`.
pub fn matches(record: &SpecialDateRecord, date: NaiveDate) -> bool {
    if record.is_recurring {
        same_month_day(record.anchor, date)
            && date_parts(date).year >= date_parts(record.anchor).year
    } else {
        record.anchor == date
    }
}

/// Returns every record occurring on `date`, in input order.
pub fn matching_on(records: &[SpecialDateRecord], date: NaiveDate) -> Vec<&SpecialDateRecord> {
    records
        .iter()
        .filter(|record| matches(record, date))
        .collect()
}

/// Returns whether any record occurs on `date`.
pub fn has_occurrence_on(records: &[SpecialDateRecord], date: NaiveDate) -> bool {
    records.iter().any(|record| matches(record, date))
}
