//! Pure special-date engine.
//!
//! # Responsibility
//! - Derive, merge, match and count down special dates.
//! - Compute reminder triggers and goal lifecycle transitions.
//!
//! # Invariants
//! - Every function is synchronous and side-effect free over immutable
//!   inputs; "today" is always passed in by the caller.
//! - Callers re-derive after any upstream profile or custom-date change.

pub mod countdown;
pub mod derive;
pub mod goal;
pub mod merge;
pub mod occurrence;
pub mod reminder;
