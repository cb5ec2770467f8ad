//! Goal and memory journal entries.
//!
//! # Responsibility
//! - Define goal-type entries (target date, completion, reminder).
//! - Define the memory record a passed goal converts into.
//!
//! # Invariants
//! - `completed_at_ms` is `Some` iff `completed` is true, and is never
//!   cleared once set.
//! - A memory converted from a goal keeps the goal's stable ID.

use crate::model::reminder::{ReminderSpec, ReminderValidationError};
use crate::model::special_date::SpecialDateId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for journal entries (goals and memories).
pub type EntryId = Uuid;

/// Goal-type journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEntry {
    pub id: EntryId,
    pub title: String,
    pub target_date: NaiveDate,
    pub notes: Option<String>,
    pub completed: bool,
    /// Unix epoch milliseconds of the completion action.
    pub completed_at_ms: Option<i64>,
    pub convert_to_memory_when_passed: bool,
    pub reminder: Option<ReminderSpec>,
    /// Special date this goal was created for, if any.
    pub origin: Option<SpecialDateId>,
}

impl GoalEntry {
    /// Creates an active goal with a generated ID.
    pub fn new(title: impl Into<String>, target_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target_date,
            notes: None,
            completed: false,
            completed_at_ms: None,
            convert_to_memory_when_passed: false,
            reminder: None,
            origin: None,
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.id.is_nil() {
            return Err(GoalValidationError::NilId);
        }
        if self.completed != self.completed_at_ms.is_some() {
            return Err(GoalValidationError::CompletionMismatch {
                completed: self.completed,
            });
        }
        if let Some(reminder) = &self.reminder {
            reminder
                .validate()
                .map_err(GoalValidationError::Reminder)?;
        }
        Ok(())
    }
}

/// Goal validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    NilId,
    CompletionMismatch { completed: bool },
    Reminder(ReminderValidationError),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "goal id must not be nil"),
            Self::CompletionMismatch { completed: true } => {
                write!(f, "completed goal must carry a completion timestamp")
            }
            Self::CompletionMismatch { completed: false } => {
                write!(f, "active goal must not carry a completion timestamp")
            }
            Self::Reminder(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reminder(err) => Some(err),
            _ => None,
        }
    }
}

/// Memory-type journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: EntryId,
    pub title: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Special date the source goal was tied to.
    pub origin: Option<SpecialDateId>,
    /// Set when this memory was converted from a passed goal.
    pub converted_from_goal: bool,
}

impl MemoryEntry {
    /// Builds the memory a passed goal converts into. Goal-only fields
    /// (completion, reminder, conversion flag) are dropped.
    pub fn from_goal(goal: &GoalEntry) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            date: goal.target_date,
            notes: goal.notes.clone(),
            origin: goal.origin,
            converted_from_goal: true,
        }
    }
}

/// Lifecycle state computed for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalState {
    Active,
    Completed,
    ConvertedToMemory,
}

/// Result of evaluating a goal against "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEvaluation {
    pub state: GoalState,
    /// Active goal whose target date has passed.
    pub overdue: bool,
    /// Present iff `state == ConvertedToMemory`.
    pub converted_memory: Option<MemoryEntry>,
}
