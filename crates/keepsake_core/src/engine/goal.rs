//! Goal lifecycle transitions.
//!
//! # Invariants
//! - `Completed` is terminal; completion stamps time exactly once.
//! - `Active -> ConvertedToMemory` happens only when the target date has
//!   passed, the goal is incomplete and conversion is enabled.
//! - Evaluation is pure: the same goal and "today" always give the same
//!   result, so repeated sweeps never double-transition.

use crate::model::goal::{GoalEntry, GoalEvaluation, GoalState, MemoryEntry};
use chrono::NaiveDate;

/// Computes the lifecycle state of `goal` on `today`.
pub fn apply_goal_lifecycle(goal: &GoalEntry, today: NaiveDate) -> GoalEvaluation {
    if goal.completed {
        return GoalEvaluation {
            state: GoalState::Completed,
            overdue: false,
            converted_memory: None,
        };
    }

    let passed = today > goal.target_date;
    if passed && goal.convert_to_memory_when_passed {
        return GoalEvaluation {
            state: GoalState::ConvertedToMemory,
            overdue: false,
            converted_memory: Some(MemoryEntry::from_goal(goal)),
        };
    }

    GoalEvaluation {
        state: GoalState::Active,
        overdue: passed,
        converted_memory: None,
    }
}

/// Returns `goal` marked completed at `now_ms`.
///
/// Completing an already completed goal returns it unchanged; the original
/// completion timestamp is kept.
pub fn complete_goal(goal: &GoalEntry, now_ms: i64) -> GoalEntry {
    let mut completed = goal.clone();
    if !completed.completed {
        completed.completed = true;
        completed.completed_at_ms = Some(now_ms);
    }
    completed
}
