//! Local notification collaborator.
//!
//! # Responsibility
//! - Define the platform gateway contract reminders are delivered through.
//! - Provide an in-memory gateway that records pending deliveries.
//! - Keep one scheduled delivery per journal entry (`ReminderService`).
//!
//! # Invariants
//! - A superseded delivery is cancelled before its replacement is scheduled.
//! - Denied authorization schedules nothing and is not an error.

use crate::model::goal::EntryId;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod gateway;
mod reminder_service;

pub use gateway::InMemoryNotificationGateway;
pub use reminder_service::{ReminderService, ReminderSync};

/// User permission state for local notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    Authorized,
    Denied,
    NotDetermined,
}

impl AuthorizationState {
    pub fn allows_delivery(self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Opaque platform handle for one scheduled delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationHandle(pub String);

impl Display for NotificationHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One delivery to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub entry_id: EntryId,
    pub trigger_date: NaiveDate,
    pub title: String,
    pub body: Option<String>,
}

/// Gateway failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    UnknownHandle(NotificationHandle),
    Platform(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownHandle(handle) => write!(f, "unknown notification handle: {handle}"),
            Self::Platform(message) => write!(f, "notification platform error: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Platform notification scheduler.
pub trait NotificationGateway: Send + Sync {
    fn authorization(&self) -> AuthorizationState;
    fn schedule(&self, request: NotificationRequest) -> Result<NotificationHandle, NotifyError>;
    /// Cancels a pending delivery. Cancelling an already delivered or
    /// unknown handle reports `UnknownHandle`.
    fn cancel(&self, handle: &NotificationHandle) -> Result<(), NotifyError>;
}
