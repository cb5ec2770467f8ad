//! Time source used by the services.
//!
//! Engine functions take "today" explicitly; only the service layer asks a
//! `Clock`, so tests pin time with `FixedClock`.

use chrono::{Local, NaiveDate, Utc};

/// Source of the current calendar day and wall-clock instant.
pub trait Clock: Send + Sync {
    /// Current local calendar day (time of day discarded).
    fn today(&self) -> NaiveDate;
    /// Current instant as unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to one day and instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_ms: i64,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self { today, now_ms }
    }

    /// Pins `today` with the instant at its UTC midnight.
    pub fn at(today: NaiveDate) -> Self {
        let now_ms = today
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { today, now_ms }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_ms(&self) -> i64 {
        self.now_ms
    }
}
