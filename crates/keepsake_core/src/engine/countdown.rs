//! Next-occurrence countdowns for special dates.
//!
//! # Responsibility
//! - Compute the nearest occurrence of a record's month/day on or after
//!   "today" and the whole-day distance to it.
//! - Render the coarse countdown label shown next to a special date.
//!
//! # Invariants
//! - "Today" counts as day 0; the result is never negative.
//! - The candidate year never precedes the anchor year.
//! - A Feb 29 anchor only lands on real Feb 29s, like the occurrence matcher.
//! - Label buckets use flat 7-day weeks and 30-day months.

use crate::calendar::{date_parts, days_between};
use crate::engine::occurrence::matches;
use crate::model::special_date::SpecialDateRecord;
use chrono::{Datelike, NaiveDate};
use std::fmt::{Display, Formatter};

// Longest gap between two Feb 29s (e.g. 2096 -> 2104).
const MAX_YEAR_SCAN: i32 = 8;

/// Nearest date on or after `today` carrying the record's month/day.
///
/// Returns `None` only when no such date is representable.
pub fn next_occurrence_date(record: &SpecialDateRecord, today: NaiveDate) -> Option<NaiveDate> {
    let anchor = date_parts(record.anchor);
    let first_year = today.year().max(anchor.year);
    (first_year..=first_year.saturating_add(MAX_YEAR_SCAN))
        .filter_map(|year| NaiveDate::from_ymd_opt(year, anchor.month, anchor.day))
        .find(|candidate| *candidate >= today)
}

/// Whole days from `today` to the next occurrence of `record`.
///
/// Saturates at `u32::MAX` when no occurrence is representable.
pub fn days_until_next(record: &SpecialDateRecord, today: NaiveDate) -> u32 {
    next_occurrence_date(record, today)
        .map(|next| u32::try_from(days_between(today, next)).unwrap_or(u32::MAX))
        .unwrap_or(u32::MAX)
}

/// Human-readable countdown for `record` relative to `today`.
pub fn next_occurrence_label(record: &SpecialDateRecord, today: NaiveDate) -> String {
    Countdown::from_days(days_until_next(record, today)).to_string()
}

/// Coarse countdown bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Today,
    Tomorrow,
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl Countdown {
    /// Buckets a day count: 0, 1, 2–6 days, 7–29 (floor weeks), 30+ (floor
    /// 30-day months).
    pub fn from_days(days: u32) -> Self {
        match days {
            0 => Self::Today,
            1 => Self::Tomorrow,
            2..=6 => Self::Days(days),
            7..=29 => Self::Weeks(days / 7),
            _ => Self::Months(days / 30),
        }
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::Tomorrow => write!(f, "Tomorrow"),
            Self::Days(n) => write!(f, "In {n} days"),
            Self::Weeks(n) => write!(f, "In {n} {}", plural(*n, "week")),
            Self::Months(n) => write!(f, "In {n} {}", plural(*n, "month")),
        }
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    }
}

/// One entry of an upcoming special-dates list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingSpecialDate<'a> {
    pub record: &'a SpecialDateRecord,
    pub date: NaiveDate,
    pub days_until: u32,
    pub countdown: Countdown,
}

/// Records occurring within `window_days` of `today`, nearest first.
///
/// Only real occurrences are listed: a one-time record whose anchor has
/// passed never appears.
pub fn upcoming(
    records: &[SpecialDateRecord],
    today: NaiveDate,
    window_days: u32,
) -> Vec<UpcomingSpecialDate<'_>> {
    let mut items: Vec<UpcomingSpecialDate<'_>> = records
        .iter()
        .filter_map(|record| {
            let date = next_occurrence_date(record, today)?;
            if !matches(record, date) {
                return None;
            }
            let days_until = u32::try_from(days_between(today, date)).ok()?;
            (days_until <= window_days).then_some(UpcomingSpecialDate {
                record,
                date,
                days_until,
                countdown: Countdown::from_days(days_until),
            })
        })
        .collect();
    items.sort_by(|left, right| {
        left.days_until
            .cmp(&right.days_until)
            .then_with(|| left.record.name.cmp(&right.record.name))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::{
        days_until_next, next_occurrence_date, next_occurrence_label, upcoming, Countdown,
    };
    use crate::model::special_date::{CustomSpecialDate, SpecialDateCategory, SpecialDateRecord};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn record(name: &str, anchor: NaiveDate, is_recurring: bool) -> SpecialDateRecord {
        CustomSpecialDate::new(name, anchor, SpecialDateCategory::Custom, is_recurring).to_record()
    }

    #[test]
    fn countdown_buckets_match_labels() {
        let cases = [
            (0, "Today"),
            (1, "Tomorrow"),
            (2, "In 2 days"),
            (6, "In 6 days"),
            (7, "In 1 week"),
            (13, "In 1 week"),
            (14, "In 2 weeks"),
            (29, "In 4 weeks"),
            (30, "In 1 month"),
            (59, "In 1 month"),
            (60, "In 2 months"),
            (364, "In 12 months"),
        ];
        for (days, label) in cases {
            assert_eq!(Countdown::from_days(days).to_string(), label, "days={days}");
        }
    }

    #[test]
    fn passed_month_day_wraps_to_next_year() {
        let birthday = record("b", date(1990, 3, 15), true);
        assert_eq!(
            next_occurrence_date(&birthday, date(2024, 3, 16)),
            Some(date(2025, 3, 15))
        );
        assert_eq!(days_until_next(&birthday, date(2024, 12, 31)), 74);
        assert_eq!(next_occurrence_label(&birthday, date(2024, 3, 15)), "Today");
    }

    #[test]
    fn future_anchor_is_not_projected_before_its_year() {
        let wedding = record("w", date(2026, 5, 20), false);
        assert_eq!(
            next_occurrence_date(&wedding, date(2024, 6, 1)),
            Some(date(2026, 5, 20))
        );
        assert_eq!(days_until_next(&wedding, date(2024, 6, 1)), 718);
        assert_eq!(
            next_occurrence_label(&wedding, date(2024, 6, 1)),
            "In 23 months"
        );
    }

    #[test]
    fn leap_day_anchor_waits_for_next_leap_year() {
        let leap = record("l", date(2020, 2, 29), true);
        assert_eq!(
            next_occurrence_date(&leap, date(2021, 1, 1)),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn upcoming_lists_real_occurrences_nearest_first() {
        let records = vec![
            record("later", date(1990, 4, 1), true),
            record("sooner", date(1990, 3, 12), true),
            record("past one-time", date(2020, 3, 11), false),
            record("outside", date(1990, 9, 1), true),
        ];
        let items = upcoming(&records, date(2024, 3, 10), 30);
        let names: Vec<&str> = items.iter().map(|item| item.record.name.as_str()).collect();
        assert_eq!(names, vec!["sooner", "later"]);
        assert_eq!(items[0].days_until, 2);
        assert_eq!(items[1].countdown, Countdown::Weeks(3));
    }
}
