//! Domain model for the special-date engine.
//!
//! # Responsibility
//! - Define profile, special-date, reminder and goal value types.
//! - Keep validation next to the types that own the invariants.
//!
//! # Invariants
//! - Optional facts are `Option<T>`; no sentinel strings or magic dates.
//! - Constructors and deserializers reject invalid values instead of
//!   coercing them.

pub mod goal;
pub mod profile;
pub mod reminder;
pub mod special_date;
