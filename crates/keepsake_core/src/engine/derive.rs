//! Special-date derivation from a biographical profile.
//!
//! # Responsibility
//! - Produce the canonical system-derived records for one profile snapshot.
//!
//! # Invariants
//! - The user's own birthday is always present.
//! - Missing facts yield fewer records, never an error.
//! - Graduation is the only one-time derived record; everything else recurs.
//! - Callers must not rely on output order.

use crate::model::profile::{usable_name, BiographicalProfile};
use crate::model::special_date::{DerivedKind, SpecialDateRecord, SpecialDateValidationError};
use chrono::NaiveDate;
use log::debug;

const GRADUATION_MONTH: u32 = 6;
const GRADUATION_DAY: u32 = 1;
const SELF_SUBJECT: &str = "self";
const SPOUSE_SUBJECT: &str = "spouse";

/// Derives system special dates from a profile snapshot.
///
/// # Contract
/// - Anniversary iff `marriage_date` is present.
/// - Spouse birthday iff spouse birth date and a non-blank spouse name exist.
/// - One child birthday per child with a non-blank name.
/// - One pet birthday per pet with both a birthday and a non-blank name.
/// - Graduation iff school name is non-blank and graduation year is positive,
///   anchored on June 1st of that year and marked non-recurring.
pub fn derive_special_dates(profile: &BiographicalProfile) -> Vec<SpecialDateRecord> {
    let mut records = Vec::with_capacity(4 + profile.children.len() + profile.pets.len());

    push_record(
        &mut records,
        SpecialDateRecord::derived(
            DerivedKind::Birthday,
            SELF_SUBJECT,
            "My Birthday",
            profile.birth_date,
            true,
        ),
    );

    if let Some(marriage_date) = profile.marriage_date {
        push_record(
            &mut records,
            SpecialDateRecord::derived(
                DerivedKind::Anniversary,
                SPOUSE_SUBJECT,
                "Wedding Anniversary",
                marriage_date,
                true,
            ),
        );
    }

    if let (Some(name), Some(birth_date)) = (
        usable_name(profile.spouse_name.as_deref()),
        profile.spouse_birth_date,
    ) {
        push_record(
            &mut records,
            SpecialDateRecord::derived(
                DerivedKind::SpouseBirthday,
                SPOUSE_SUBJECT,
                format!("{name}'s Birthday"),
                birth_date,
                true,
            ),
        );
    }

    for child in &profile.children {
        let Some(name) = usable_name(child.name.as_deref()) else {
            continue;
        };
        push_record(
            &mut records,
            SpecialDateRecord::derived(
                DerivedKind::ChildBirthday,
                name,
                format!("{name}'s Birthday"),
                child.birth_date,
                true,
            ),
        );
    }

    for pet in &profile.pets {
        let (Some(name), Some(birth_date)) = (usable_name(pet.name.as_deref()), pet.birth_date)
        else {
            continue;
        };
        push_record(
            &mut records,
            SpecialDateRecord::derived(
                DerivedKind::PetBirthday,
                name,
                format!("{name}'s Birthday"),
                birth_date,
                true,
            ),
        );
    }

    if let Some((school, graduation_date)) = graduation(profile) {
        push_record(
            &mut records,
            SpecialDateRecord::derived(
                DerivedKind::Graduation,
                school,
                format!("Graduation from {school}"),
                graduation_date,
                false,
            ),
        );
    }

    debug!(
        "event=special_dates_derive module=engine status=ok count={}",
        records.len()
    );
    records
}

fn graduation(profile: &BiographicalProfile) -> Option<(&str, NaiveDate)> {
    let school = usable_name(profile.school_name.as_deref())?;
    let year = profile.graduation_year.filter(|year| *year > 0)?;
    let date = NaiveDate::from_ymd_opt(year, GRADUATION_MONTH, GRADUATION_DAY)?;
    Some((school, date))
}

// Derived inputs are built from validated parts; a failure here means a
// blank name slipped past `usable_name`, so the record is dropped.
fn push_record(
    records: &mut Vec<SpecialDateRecord>,
    record: Result<SpecialDateRecord, SpecialDateValidationError>,
) {
    match record {
        Ok(record) => records.push(record),
        Err(err) => debug!(
            "event=special_dates_derive module=engine status=skipped reason={}",
            err
        ),
    }
}
