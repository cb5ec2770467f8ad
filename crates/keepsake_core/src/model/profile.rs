//! Biographical profile input model.
//!
//! # Responsibility
//! - Describe the person whose life events are derived into special dates.
//!
//! # Invariants
//! - Optional facts are `Option<T>`; absence is never encoded as an empty
//!   string or a placeholder date.
//! - `Some("")` and `None` are distinct and persisted as such; derivation
//!   treats both (and whitespace-only names) as "no usable name".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque owner key used by storage collaborators.
pub type UserId = String;

/// One child listed in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub name: Option<String>,
    pub birth_date: NaiveDate,
}

/// One pet listed in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Read-only biographical snapshot owned by the calling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiographicalProfile {
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub marriage_date: Option<NaiveDate>,
    #[serde(default)]
    pub spouse_name: Option<String>,
    #[serde(default)]
    pub spouse_birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

impl BiographicalProfile {
    /// Creates a profile with only the required birth date.
    pub fn new(birth_date: NaiveDate) -> Self {
        Self {
            birth_date,
            marriage_date: None,
            spouse_name: None,
            spouse_birth_date: None,
            children: Vec::new(),
            pets: Vec::new(),
            school_name: None,
            graduation_year: None,
        }
    }
}

/// Returns the trimmed name when it carries visible text.
pub(crate) fn usable_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|value| !value.is_empty())
}
