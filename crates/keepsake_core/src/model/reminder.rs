//! Reminder specification model.
//!
//! # Responsibility
//! - Describe when a goal should be reminded: target, frequency, lead time
//!   and optional series end.
//!
//! # Invariants
//! - Lead-time magnitude is bounded per unit (days <= 30, weeks <= 52,
//!   months <= 11). Out-of-range values are rejected, never clamped.
//! - A recurring spec always carries a frequency other than `None`.
//! - `end_date`, when set, is not earlier than `target`.

use crate::calendar::CalendarInterval;
use crate::model::special_date::SpecialDateId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MAX_LEAD_DAYS: u32 = 30;
pub const MAX_LEAD_WEEKS: u32 = 52;
pub const MAX_LEAD_MONTHS: u32 = 11;

/// Repeat cadence of a reminder series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    None,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl ReminderFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Step between two consecutive instances, `None` for one-shot specs.
    pub fn interval(self) -> Option<CalendarInterval> {
        match self {
            Self::None => None,
            Self::Weekly => Some(CalendarInterval::Weeks(1)),
            Self::Biweekly => Some(CalendarInterval::Weeks(2)),
            Self::Monthly => Some(CalendarInterval::Months(1)),
            Self::Yearly => Some(CalendarInterval::Years(1)),
        }
    }
}

/// Unit of a reminder lead time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeUnit {
    Days,
    Weeks,
    Months,
}

impl LeadTimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            _ => None,
        }
    }

    /// Largest accepted magnitude for this unit.
    pub fn max_magnitude(self) -> u32 {
        match self {
            Self::Days => MAX_LEAD_DAYS,
            Self::Weeks => MAX_LEAD_WEEKS,
            Self::Months => MAX_LEAD_MONTHS,
        }
    }
}

/// Validated offset subtracted from an instance date to get its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LeadTimeWire")]
pub struct LeadTime {
    magnitude: u32,
    unit: LeadTimeUnit,
}

#[derive(Deserialize)]
struct LeadTimeWire {
    magnitude: u32,
    unit: LeadTimeUnit,
}

impl TryFrom<LeadTimeWire> for LeadTime {
    type Error = ReminderValidationError;

    fn try_from(wire: LeadTimeWire) -> Result<Self, Self::Error> {
        Self::new(wire.magnitude, wire.unit)
    }
}

impl LeadTime {
    /// Creates a lead time after bounds validation.
    ///
    /// # Errors
    /// - `LeadTimeOutOfRange` when `magnitude` exceeds the unit bound.
    pub fn new(magnitude: u32, unit: LeadTimeUnit) -> Result<Self, ReminderValidationError> {
        let max = unit.max_magnitude();
        if magnitude > max {
            return Err(ReminderValidationError::LeadTimeOutOfRange {
                magnitude,
                unit,
                max,
            });
        }
        Ok(Self { magnitude, unit })
    }

    /// Zero-length lead: remind on the instance date itself.
    pub fn none() -> Self {
        Self {
            magnitude: 0,
            unit: LeadTimeUnit::Days,
        }
    }

    pub fn magnitude(self) -> u32 {
        self.magnitude
    }

    pub fn unit(self) -> LeadTimeUnit {
        self.unit
    }

    pub fn interval(self) -> CalendarInterval {
        match self.unit {
            LeadTimeUnit::Days => CalendarInterval::Days(self.magnitude),
            LeadTimeUnit::Weeks => CalendarInterval::Weeks(self.magnitude),
            LeadTimeUnit::Months => CalendarInterval::Months(self.magnitude),
        }
    }
}

/// Reminder construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    LeadTimeOutOfRange {
        magnitude: u32,
        unit: LeadTimeUnit,
        max: u32,
    },
    MissingFrequency,
    EndBeforeTarget {
        target: NaiveDate,
        end: NaiveDate,
    },
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeadTimeOutOfRange {
                magnitude,
                unit,
                max,
            } => write!(
                f,
                "lead time {magnitude} {} is out of range (max {max})",
                unit.as_str()
            ),
            Self::MissingFrequency => {
                write!(f, "recurring reminder requires a frequency other than `none`")
            }
            Self::EndBeforeTarget { target, end } => write!(
                f,
                "reminder end date ({end}) must be >= target date ({target})"
            ),
        }
    }
}

impl Error for ReminderValidationError {}

/// Reminder attached to a goal-type entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReminderSpecWire")]
pub struct ReminderSpec {
    pub target: NaiveDate,
    pub frequency: ReminderFrequency,
    pub lead_time: LeadTime,
    pub end_date: Option<NaiveDate>,
    pub is_recurring: bool,
    /// Special date this reminder was generated from, if any.
    pub origin: Option<SpecialDateId>,
}

#[derive(Deserialize)]
struct ReminderSpecWire {
    target: NaiveDate,
    frequency: ReminderFrequency,
    lead_time: LeadTime,
    end_date: Option<NaiveDate>,
    is_recurring: bool,
    origin: Option<SpecialDateId>,
}

impl TryFrom<ReminderSpecWire> for ReminderSpec {
    type Error = ReminderValidationError;

    fn try_from(wire: ReminderSpecWire) -> Result<Self, Self::Error> {
        let spec = Self {
            target: wire.target,
            frequency: wire.frequency,
            lead_time: wire.lead_time,
            end_date: wire.end_date,
            is_recurring: wire.is_recurring,
            origin: wire.origin,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl ReminderSpec {
    /// One-shot reminder `lead_time` before `target`.
    pub fn one_time(target: NaiveDate, lead_time: LeadTime) -> Self {
        Self {
            target,
            frequency: ReminderFrequency::None,
            lead_time,
            end_date: None,
            is_recurring: false,
            origin: None,
        }
    }

    /// Recurring reminder series starting at `target`.
    ///
    /// # Errors
    /// - `MissingFrequency` when `frequency` is `None`.
    /// - `EndBeforeTarget` when `end_date` precedes `target`.
    pub fn recurring(
        target: NaiveDate,
        frequency: ReminderFrequency,
        lead_time: LeadTime,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ReminderValidationError> {
        let spec = Self {
            target,
            frequency,
            lead_time,
            end_date,
            is_recurring: true,
            origin: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Sets the originating special-date back-reference.
    pub fn with_origin(mut self, origin: SpecialDateId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn validate(&self) -> Result<(), ReminderValidationError> {
        if self.is_recurring && self.frequency == ReminderFrequency::None {
            return Err(ReminderValidationError::MissingFrequency);
        }
        if let Some(end) = self.end_date {
            if end < self.target {
                return Err(ReminderValidationError::EndBeforeTarget {
                    target: self.target,
                    end,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LeadTime, LeadTimeUnit, ReminderFrequency, ReminderSpec, ReminderValidationError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn lead_time_bounds_are_inclusive_per_unit() {
        assert!(LeadTime::new(30, LeadTimeUnit::Days).is_ok());
        assert!(LeadTime::new(52, LeadTimeUnit::Weeks).is_ok());
        assert!(LeadTime::new(11, LeadTimeUnit::Months).is_ok());

        assert_eq!(
            LeadTime::new(31, LeadTimeUnit::Days),
            Err(ReminderValidationError::LeadTimeOutOfRange {
                magnitude: 31,
                unit: LeadTimeUnit::Days,
                max: 30,
            })
        );
        assert!(LeadTime::new(53, LeadTimeUnit::Weeks).is_err());
        assert!(LeadTime::new(12, LeadTimeUnit::Months).is_err());
    }

    #[test]
    fn recurring_spec_requires_frequency_and_ordered_end() {
        assert_eq!(
            ReminderSpec::recurring(date(2024, 1, 1), ReminderFrequency::None, LeadTime::none(), None),
            Err(ReminderValidationError::MissingFrequency)
        );
        assert!(matches!(
            ReminderSpec::recurring(
                date(2024, 1, 1),
                ReminderFrequency::Weekly,
                LeadTime::none(),
                Some(date(2023, 12, 31)),
            ),
            Err(ReminderValidationError::EndBeforeTarget { .. })
        ));
    }

    #[test]
    fn deserialize_rejects_out_of_range_lead_time() {
        let value = serde_json::json!({
            "target": "2024-05-01",
            "frequency": "monthly",
            "lead_time": { "magnitude": 12, "unit": "months" },
            "end_date": null,
            "is_recurring": true,
            "origin": null
        });
        let err = serde_json::from_value::<ReminderSpec>(value).unwrap_err();
        assert!(err.to_string().contains("out of range"), "unexpected error: {err}");
    }

    #[test]
    fn frequency_parse_matches_storage_values() {
        for frequency in [
            ReminderFrequency::None,
            ReminderFrequency::Weekly,
            ReminderFrequency::Biweekly,
            ReminderFrequency::Monthly,
            ReminderFrequency::Yearly,
        ] {
            assert_eq!(ReminderFrequency::parse(frequency.as_str()), Some(frequency));
        }
    }
}
