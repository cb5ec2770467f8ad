//! Keepsake core: special dates, reminders and goal journaling.
//! The engine is pure; storage, clock and notifications sit behind traits.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::countdown::{
    days_until_next, next_occurrence_date, next_occurrence_label, upcoming, Countdown,
    UpcomingSpecialDate,
};
pub use engine::derive::derive_special_dates;
pub use engine::goal::{apply_goal_lifecycle, complete_goal};
pub use engine::merge::{merge_special_dates, merge_with_store};
pub use engine::occurrence::{has_occurrence_on, matches, matching_on};
pub use engine::reminder::{
    is_series_expired, next_reminder_trigger, reminder_for_special_date, trigger_preview,
};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::goal::{EntryId, GoalEntry, GoalEvaluation, GoalState, MemoryEntry};
pub use model::profile::{BiographicalProfile, Child, Pet, UserId};
pub use model::reminder::{
    LeadTime, LeadTimeUnit, ReminderFrequency, ReminderSpec, ReminderValidationError,
};
pub use model::special_date::{
    CustomSpecialDate, DerivedKind, Provenance, SpecialDateCategory, SpecialDateId,
    SpecialDateRecord, SpecialDateStore, SpecialDateValidationError,
};
pub use notify::{
    AuthorizationState, InMemoryNotificationGateway, NotificationGateway, NotificationHandle,
    NotificationRequest, NotifyError, ReminderService, ReminderSync,
};
pub use repo::{InMemoryLifeStore, LifeStore, RepoError, RepoResult, SqliteLifeStore};
pub use service::{GoalService, ServiceError, SpecialDateService, SweepReport, UpcomingDate};
pub use storage::{bootstrap_store_registry, BootstrapError, StoreRegistry, StoreRegistryError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
