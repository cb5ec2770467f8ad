//! Use-case services over the pure engine.
//!
//! # Responsibility
//! - Combine store reads, engine evaluation, clock and notifications into
//!   the operations hosts call.
//! - Keep hosts unaware of concrete storage or platform types.

use crate::model::goal::EntryId;
use crate::model::special_date::SpecialDateId;
use crate::notify::NotifyError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod goal_service;
pub mod special_date_service;

pub use goal_service::{GoalService, SweepReport};
pub use special_date_service::{SpecialDateService, UpcomingDate};

/// Error for service-level use cases.
#[derive(Debug)]
pub enum ServiceError {
    GoalNotFound(EntryId),
    SpecialDateNotFound(SpecialDateId),
    Repo(RepoError),
    Notify(NotifyError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::SpecialDateNotFound(id) => write!(f, "special date not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Notify(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Notify(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<NotifyError> for ServiceError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
