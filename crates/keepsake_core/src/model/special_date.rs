//! Special-date records and the custom-date store.
//!
//! # Responsibility
//! - Define the record shape every occurrence/countdown computation runs on.
//! - Hold user-authored custom dates keyed by stable ID.
//! - Resolve display metadata (label/icon) per category and provenance.
//!
//! # Invariants
//! - `name` is never blank after validation.
//! - A record derived from a one-time life event (graduation) is never
//!   recurring.
//! - Derived record IDs are deterministic for the same kind + subject + date,
//!   so reminders can keep a back-reference across re-derivation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for special-date records.
pub type SpecialDateId = Uuid;

const DERIVED_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6b65_6570_7361_6b65_8000_0000_6465_7276);

/// Closed category set for special dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDateCategory {
    Birthday,
    Anniversary,
    FamilyBirthday,
    Achievement,
    Religious,
    Cultural,
    Health,
    Travel,
    Memorial,
    Custom,
}

impl SpecialDateCategory {
    pub const ALL: [Self; 10] = [
        Self::Birthday,
        Self::Anniversary,
        Self::FamilyBirthday,
        Self::Achievement,
        Self::Religious,
        Self::Cultural,
        Self::Health,
        Self::Travel,
        Self::Memorial,
        Self::Custom,
    ];

    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::FamilyBirthday => "family_birthday",
            Self::Achievement => "achievement",
            Self::Religious => "religious",
            Self::Cultural => "cultural",
            Self::Health => "health",
            Self::Travel => "travel",
            Self::Memorial => "memorial",
            Self::Custom => "custom",
        }
    }

    /// Parses a stable storage value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }

    /// User-facing category label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::Anniversary => "Anniversary",
            Self::FamilyBirthday => "Family Birthday",
            Self::Achievement => "Achievement",
            Self::Religious => "Religious",
            Self::Cultural => "Cultural",
            Self::Health => "Health",
            Self::Travel => "Travel",
            Self::Memorial => "Memorial",
            Self::Custom => "Custom",
        }
    }

    /// Symbolic icon name for the category.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Birthday => "gift",
            Self::Anniversary => "heart",
            Self::FamilyBirthday => "person.2",
            Self::Achievement => "trophy",
            Self::Religious => "sparkles",
            Self::Cultural => "globe",
            Self::Health => "cross.case",
            Self::Travel => "airplane",
            Self::Memorial => "leaf",
            Self::Custom => "star",
        }
    }
}

/// Life event a system-derived record was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedKind {
    Birthday,
    Anniversary,
    SpouseBirthday,
    ChildBirthday,
    PetBirthday,
    Graduation,
}

impl DerivedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::SpouseBirthday => "spouse_birthday",
            Self::ChildBirthday => "child_birthday",
            Self::PetBirthday => "pet_birthday",
            Self::Graduation => "graduation",
        }
    }

    /// Whether this event happens exactly once in a life.
    pub fn is_one_time(self) -> bool {
        matches!(self, Self::Graduation)
    }

    /// Category assigned to records of this kind.
    pub fn category(self) -> SpecialDateCategory {
        match self {
            Self::Birthday => SpecialDateCategory::Birthday,
            Self::Anniversary => SpecialDateCategory::Anniversary,
            Self::SpouseBirthday | Self::ChildBirthday | Self::PetBirthday => {
                SpecialDateCategory::FamilyBirthday
            }
            Self::Graduation => SpecialDateCategory::Achievement,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Birthday => "birthday.cake",
            Self::Anniversary => "heart.circle",
            Self::SpouseBirthday => "heart.text.square",
            Self::ChildBirthday => "figure.child",
            Self::PetBirthday => "pawprint",
            Self::Graduation => "graduationcap",
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Algorithmically produced from a biographical profile.
    Derived(DerivedKind),
    /// Authored directly by the user.
    Custom,
}

/// Validation errors for special-date records and custom dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialDateValidationError {
    EmptyName,
    RecurringOneTimeEvent(DerivedKind),
    NilId,
}

impl Display for SpecialDateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "special date name must not be empty"),
            Self::RecurringOneTimeEvent(kind) => write!(
                f,
                "special date of kind `{}` is a one-time event and cannot recur",
                kind.as_str()
            ),
            Self::NilId => write!(f, "special date id must not be nil"),
        }
    }
}

impl Error for SpecialDateValidationError {}

/// Unit every occurrence computation operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpecialDateRecordWire")]
pub struct SpecialDateRecord {
    pub id: SpecialDateId,
    pub name: String,
    /// Date the underlying real-world event first happened.
    pub anchor: NaiveDate,
    pub category: SpecialDateCategory,
    pub is_recurring: bool,
    pub notes: Option<String>,
    pub provenance: Provenance,
}

#[derive(Deserialize)]
struct SpecialDateRecordWire {
    id: SpecialDateId,
    name: String,
    anchor: NaiveDate,
    category: SpecialDateCategory,
    is_recurring: bool,
    notes: Option<String>,
    provenance: Provenance,
}

impl TryFrom<SpecialDateRecordWire> for SpecialDateRecord {
    type Error = SpecialDateValidationError;

    fn try_from(wire: SpecialDateRecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            id: wire.id,
            name: wire.name,
            anchor: wire.anchor,
            category: wire.category,
            is_recurring: wire.is_recurring,
            notes: wire.notes,
            provenance: wire.provenance,
        };
        record.validate()?;
        Ok(record)
    }
}

impl SpecialDateRecord {
    /// Builds a validated system-derived record with a deterministic ID.
    ///
    /// `subject` disambiguates records of the same kind (child/pet name).
    pub fn derived(
        kind: DerivedKind,
        subject: &str,
        name: impl Into<String>,
        anchor: NaiveDate,
        is_recurring: bool,
    ) -> Result<Self, SpecialDateValidationError> {
        let record = Self {
            id: derived_record_id(kind, subject, anchor),
            name: name.into(),
            anchor,
            category: kind.category(),
            is_recurring,
            notes: None,
            provenance: Provenance::Derived(kind),
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `NilId` when the ID is nil.
    /// - `EmptyName` when the name is blank.
    /// - `RecurringOneTimeEvent` when a one-time derived kind is recurring.
    pub fn validate(&self) -> Result<(), SpecialDateValidationError> {
        if self.id.is_nil() {
            return Err(SpecialDateValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(SpecialDateValidationError::EmptyName);
        }
        if let Provenance::Derived(kind) = self.provenance {
            if kind.is_one_time() && self.is_recurring {
                return Err(SpecialDateValidationError::RecurringOneTimeEvent(kind));
            }
        }
        Ok(())
    }

    /// Returns whether this record came from the biographical profile.
    pub fn is_derived(&self) -> bool {
        matches!(self.provenance, Provenance::Derived(_))
    }

    /// Icon resolved from provenance first, then category.
    pub fn icon(&self) -> &'static str {
        match self.provenance {
            Provenance::Derived(kind) => kind.icon(),
            Provenance::Custom => self.category.icon(),
        }
    }
}

/// Deterministic ID for a derived record.
pub fn derived_record_id(kind: DerivedKind, subject: &str, anchor: NaiveDate) -> SpecialDateId {
    let key = format!("{}:{}:{}", kind.as_str(), subject.trim(), anchor);
    Uuid::new_v5(&DERIVED_ID_NAMESPACE, key.as_bytes())
}

/// User-authored special date as persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSpecialDate {
    pub id: SpecialDateId,
    pub name: String,
    pub date: NaiveDate,
    pub category: SpecialDateCategory,
    pub is_recurring: bool,
    pub notes: Option<String>,
}

impl CustomSpecialDate {
    /// Creates a custom date with a generated ID.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        category: SpecialDateCategory,
        is_recurring: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            category,
            is_recurring,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), SpecialDateValidationError> {
        if self.id.is_nil() {
            return Err(SpecialDateValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(SpecialDateValidationError::EmptyName);
        }
        Ok(())
    }

    /// Projects this custom date into the engine record shape.
    pub fn to_record(&self) -> SpecialDateRecord {
        SpecialDateRecord {
            id: self.id,
            name: self.name.trim().to_string(),
            anchor: self.date,
            category: self.category,
            is_recurring: self.is_recurring,
            notes: self.notes.clone(),
            provenance: Provenance::Custom,
        }
    }
}

/// Store-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialDateStoreError {
    Validation(SpecialDateValidationError),
    DuplicateId(SpecialDateId),
}

impl Display for SpecialDateStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "special date already exists: {id}"),
        }
    }
}

impl Error for SpecialDateStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<SpecialDateValidationError> for SpecialDateStoreError {
    fn from(value: SpecialDateValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Custom special dates keyed by ID. Holds no derivation logic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialDateStore {
    entries: BTreeMap<SpecialDateId, CustomSpecialDate>,
}

impl SpecialDateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new custom date, rejecting an ID that is already present.
    pub fn insert(&mut self, date: CustomSpecialDate) -> Result<(), SpecialDateStoreError> {
        date.validate()?;
        if self.entries.contains_key(&date.id) {
            return Err(SpecialDateStoreError::DuplicateId(date.id));
        }
        self.entries.insert(date.id, date);
        Ok(())
    }

    /// Inserts or replaces a custom date, returning the replaced value.
    pub fn upsert(
        &mut self,
        date: CustomSpecialDate,
    ) -> Result<Option<CustomSpecialDate>, SpecialDateStoreError> {
        date.validate()?;
        Ok(self.entries.insert(date.id, date))
    }

    pub fn remove(&mut self, id: SpecialDateId) -> Option<CustomSpecialDate> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: SpecialDateId) -> Option<&CustomSpecialDate> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomSpecialDate> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Engine records for every stored custom date.
    pub fn to_records(&self) -> Vec<SpecialDateRecord> {
        self.iter().map(CustomSpecialDate::to_record).collect()
    }
}
