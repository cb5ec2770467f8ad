//! Merge of derived and custom special dates.
//!
//! # Responsibility
//! - Combine profile-derived records with user-authored custom dates into one
//!   normalized collection.
//!
//! # Invariants
//! - Output order is derived records first, then custom records, each in
//!   input order.
//! - Record IDs are unique in the output; a custom record whose ID collides
//!   with an earlier record is dropped.
//! - Names are trimmed; records that fail validation are dropped.

use crate::model::special_date::{SpecialDateRecord, SpecialDateStore};
use log::warn;
use std::collections::HashSet;

/// Merges derived records with custom records into one collection.
pub fn merge_special_dates(
    derived: Vec<SpecialDateRecord>,
    custom: Vec<SpecialDateRecord>,
) -> Vec<SpecialDateRecord> {
    let mut seen = HashSet::with_capacity(derived.len() + custom.len());
    let mut merged = Vec::with_capacity(derived.len() + custom.len());

    for mut record in derived.into_iter().chain(custom) {
        record.name = record.name.trim().to_string();
        if let Err(err) = record.validate() {
            warn!(
                "event=special_dates_merge module=engine status=skipped id={} reason={}",
                record.id, err
            );
            continue;
        }
        if !seen.insert(record.id) {
            warn!(
                "event=special_dates_merge module=engine status=skipped id={} reason=duplicate_id",
                record.id
            );
            continue;
        }
        merged.push(record);
    }

    merged
}

/// Convenience over [`merge_special_dates`] taking the custom-date store.
pub fn merge_with_store(
    derived: Vec<SpecialDateRecord>,
    store: &SpecialDateStore,
) -> Vec<SpecialDateRecord> {
    merge_special_dates(derived, store.to_records())
}

#[cfg(test)]
mod tests {
    use super::{merge_special_dates, merge_with_store};
    use crate::engine::derive::derive_special_dates;
    use crate::model::profile::BiographicalProfile;
    use crate::model::special_date::{
        CustomSpecialDate, Provenance, SpecialDateCategory, SpecialDateStore,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn derived_records_come_before_custom_records() {
        let derived = derive_special_dates(&BiographicalProfile::new(date(1990, 3, 15)));
        let mut store = SpecialDateStore::new();
        store
            .insert(CustomSpecialDate::new(
                "  First apartment ",
                date(2015, 9, 1),
                SpecialDateCategory::Custom,
                true,
            ))
            .expect("insert");

        let merged = merge_with_store(derived, &store);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].is_derived());
        assert_eq!(merged[1].provenance, Provenance::Custom);
        assert_eq!(merged[1].name, "First apartment");
    }

    #[test]
    fn colliding_ids_keep_the_first_record() {
        let derived = derive_special_dates(&BiographicalProfile::new(date(1990, 3, 15)));
        let mut clash = CustomSpecialDate::new(
            "Clash",
            date(2001, 1, 1),
            SpecialDateCategory::Custom,
            false,
        )
        .to_record();
        clash.id = derived[0].id;

        let merged = merge_special_dates(derived.clone(), vec![clash]);
        assert_eq!(merged, derived);
    }

    #[test]
    fn blank_custom_records_are_dropped() {
        let mut blank =
            CustomSpecialDate::new("x", date(2001, 1, 1), SpecialDateCategory::Custom, false)
                .to_record();
        blank.name = "   ".to_string();
        assert!(merge_special_dates(Vec::new(), vec![blank]).is_empty());
    }
}
