//! Calendar arithmetic shared by the special-date engine.
//!
//! # Responsibility
//! - Extract `(year, month, day)` parts and compare month/day ignoring year.
//! - Add or subtract calendar intervals with end-of-month clamping.
//! - Compute whole-day differences between dates.
//!
//! # Invariants
//! - Month and year arithmetic never produces an invalid date: a day that
//!   does not exist in the target month clamps to that month's last day
//!   (Jan 31 + 1 month = Feb 28/29).
//! - All functions are pure; `None` is returned only when the result leaves
//!   the representable date range.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar parts of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// One calendar step used by reminder frequencies and lead times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "snake_case")]
pub enum CalendarInterval {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl CalendarInterval {
    /// Multiplies the interval magnitude, keeping the unit.
    ///
    /// Returns `None` on magnitude overflow.
    pub fn times(self, factor: u32) -> Option<Self> {
        Some(match self {
            Self::Days(n) => Self::Days(n.checked_mul(factor)?),
            Self::Weeks(n) => Self::Weeks(n.checked_mul(factor)?),
            Self::Months(n) => Self::Months(n.checked_mul(factor)?),
            Self::Years(n) => Self::Years(n.checked_mul(factor)?),
        })
    }
}

/// Splits a date into calendar parts.
pub fn date_parts(date: NaiveDate) -> DateParts {
    DateParts {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    }
}

/// Returns whether both dates fall on the same month and day, ignoring year.
pub fn same_month_day(left: NaiveDate, right: NaiveDate) -> bool {
    left.month() == right.month() && left.day() == right.day()
}

/// Builds `year-month-day`, clamping `day` to the last valid day of the month.
///
/// Used when a month/day pair is projected onto another year, e.g. a Feb 29
/// anchor in a non-leap year resolves to Feb 28.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_day = days_in_month(first);
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next_first) => next_first.signed_duration_since(first).num_days() as u32,
        // Only reachable for the final representable month, which is December.
        None => 31,
    }
}

/// Adds one calendar interval to `date`.
pub fn add_interval(date: NaiveDate, interval: CalendarInterval) -> Option<NaiveDate> {
    match interval {
        CalendarInterval::Days(n) => date.checked_add_days(Days::new(u64::from(n))),
        CalendarInterval::Weeks(n) => date.checked_add_days(Days::new(u64::from(n) * 7)),
        CalendarInterval::Months(n) => date.checked_add_months(Months::new(n)),
        CalendarInterval::Years(n) => date.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

/// Subtracts one calendar interval from `date` with the same semantics as
/// [`add_interval`].
pub fn subtract_interval(date: NaiveDate, interval: CalendarInterval) -> Option<NaiveDate> {
    match interval {
        CalendarInterval::Days(n) => date.checked_sub_days(Days::new(u64::from(n))),
        CalendarInterval::Weeks(n) => date.checked_sub_days(Days::new(u64::from(n) * 7)),
        CalendarInterval::Months(n) => date.checked_sub_months(Months::new(n)),
        CalendarInterval::Years(n) => date.checked_sub_months(Months::new(n.checked_mul(12)?)),
    }
}

/// Signed whole-day difference `to - from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Whole calendar months from `from` to `to`, ignoring day-of-month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}
