use chrono::NaiveDate;
use keepsake_core::{
    complete_goal, BiographicalProfile, Child, CustomSpecialDate, GoalEntry, InMemoryLifeStore,
    LeadTime, LeadTimeUnit, LifeStore, MemoryEntry, Pet, ReminderFrequency, ReminderSpec,
    RepoError, SpecialDateCategory, SqliteLifeStore,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn stores() -> Vec<Box<dyn LifeStore>> {
    vec![
        Box::new(InMemoryLifeStore::new()),
        Box::new(SqliteLifeStore::open_in_memory().expect("sqlite store")),
    ]
}

fn full_profile() -> BiographicalProfile {
    let mut profile = BiographicalProfile::new(date(1990, 3, 15));
    profile.marriage_date = Some(date(2015, 6, 20));
    profile.spouse_name = Some(String::new());
    profile.spouse_birth_date = None;
    profile.children = vec![
        Child {
            name: Some("Mia".to_string()),
            birth_date: date(2018, 1, 31),
        },
        Child {
            name: None,
            birth_date: date(2020, 1, 10),
        },
    ];
    profile.pets = vec![Pet {
        name: Some("Rex".to_string()),
        birth_date: None,
    }];
    profile.school_name = Some("Hill High".to_string());
    profile.graduation_year = Some(2008);
    profile
}

#[test]
fn profile_round_trips_with_absent_and_empty_fields() {
    for store in stores() {
        let provider = store.provider_id().to_string();
        assert_eq!(store.load_profile("u1").expect("load"), None, "{provider}");

        let profile = full_profile();
        store.save_profile("u1", &profile).expect("save");
        let loaded = store.load_profile("u1").expect("load").expect("present");
        assert_eq!(loaded, profile, "{provider}");
        assert_eq!(loaded.spouse_name.as_deref(), Some(""), "{provider}");

        let mut smaller = profile.clone();
        smaller.children.truncate(1);
        smaller.pets.clear();
        store.save_profile("u1", &smaller).expect("resave");
        assert_eq!(
            store.load_profile("u1").expect("load").expect("present"),
            smaller,
            "{provider}"
        );
    }
}

#[test]
fn blank_user_id_is_rejected() {
    for store in stores() {
        assert!(matches!(
            store.load_goals("  "),
            Err(RepoError::InvalidUserId)
        ));
    }
}

#[test]
fn custom_dates_are_scoped_by_owner() {
    for store in stores() {
        let provider = store.provider_id().to_string();
        let mut date_a = CustomSpecialDate::new(
            "Adoption day",
            date(2020, 3, 11),
            SpecialDateCategory::Custom,
            true,
        );
        date_a.notes = Some(String::new());
        store.save_custom_date("u1", &date_a).expect("save");

        let loaded = store.load_custom_dates("u1").expect("load");
        assert_eq!(loaded.get(date_a.id), Some(&date_a), "{provider}");
        assert!(store.load_custom_dates("u2").expect("load").is_empty());

        assert!(
            matches!(
                store.save_custom_date("u2", &date_a),
                Err(RepoError::NotFound { .. })
            ),
            "{provider}"
        );
        assert!(matches!(
            store.delete_custom_date("u2", date_a.id),
            Err(RepoError::NotFound { .. })
        ));

        date_a.name = "Gotcha day".to_string();
        store.save_custom_date("u1", &date_a).expect("update");
        assert_eq!(
            store
                .load_custom_dates("u1")
                .expect("load")
                .get(date_a.id)
                .map(|stored| stored.name.as_str()),
            Some("Gotcha day")
        );

        store.delete_custom_date("u1", date_a.id).expect("delete");
        assert!(store.load_custom_dates("u1").expect("load").is_empty());
    }
}

#[test]
fn blank_custom_date_name_is_rejected() {
    for store in stores() {
        let invalid =
            CustomSpecialDate::new("  ", date(2020, 3, 11), SpecialDateCategory::Custom, true);
        assert!(matches!(
            store.save_custom_date("u1", &invalid),
            Err(RepoError::SpecialDate(_))
        ));
    }
}

#[test]
fn goal_with_reminder_round_trips() {
    for store in stores() {
        let provider = store.provider_id().to_string();
        let mut goal = GoalEntry::new("Plan the trip", date(2024, 9, 1));
        goal.notes = Some(String::new());
        goal.origin = Some(Uuid::new_v4());
        goal.reminder = Some(
            ReminderSpec::recurring(
                date(2024, 9, 1),
                ReminderFrequency::Biweekly,
                LeadTime::new(2, LeadTimeUnit::Weeks).expect("lead"),
                Some(date(2025, 1, 1)),
            )
            .expect("spec"),
        );
        store.save_goal("u1", &goal).expect("save");

        assert_eq!(
            store.load_goal("u1", goal.id).expect("load"),
            Some(goal.clone()),
            "{provider}"
        );
        assert_eq!(store.load_goal("u2", goal.id).expect("load"), None);
        assert_eq!(store.load_goals("u1").expect("list"), vec![goal]);
    }
}

#[test]
fn completion_cannot_be_undone_and_keeps_first_timestamp() {
    for store in stores() {
        let provider = store.provider_id().to_string();
        let goal = GoalEntry::new("Learn piano", date(2024, 9, 1));
        store.save_goal("u1", &goal).expect("save");

        let done = complete_goal(&goal, 1_000);
        store.save_goal("u1", &done).expect("complete");

        let mut restamped = done.clone();
        restamped.completed_at_ms = Some(9_000);
        store.save_goal("u1", &restamped).expect("resave completed");
        let stored = store.load_goal("u1", goal.id).expect("load").expect("present");
        assert_eq!(stored.completed_at_ms, Some(1_000), "{provider}");

        assert!(
            matches!(
                store.save_goal("u1", &goal),
                Err(RepoError::InvalidData(_))
            ),
            "{provider}"
        );
        assert!(matches!(
            store.save_goal("u2", &done),
            Err(RepoError::InvalidData(_))
        ));
    }
}

#[test]
fn goal_converts_to_memory_atomically() {
    for store in stores() {
        let provider = store.provider_id().to_string();
        let mut goal = GoalEntry::new("Visit Rome", date(2024, 6, 1));
        goal.convert_to_memory_when_passed = true;
        store.save_goal("u1", &goal).expect("save");

        let memory = MemoryEntry::from_goal(&goal);
        store
            .convert_goal_to_memory("u1", &memory)
            .expect("convert");
        assert!(store.load_goals("u1").expect("goals").is_empty(), "{provider}");
        assert_eq!(store.load_memories("u1").expect("memories"), vec![memory.clone()]);

        assert!(matches!(
            store.convert_goal_to_memory("u1", &memory),
            Err(RepoError::NotFound { .. })
        ));
        assert_eq!(store.load_memories("u1").expect("memories").len(), 1);
    }
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("keepsake.db");
    let goal = GoalEntry::new("Run a marathon", date(2025, 4, 6));

    {
        let store = SqliteLifeStore::open(&path).expect("open");
        store
            .save_profile("u1", &full_profile())
            .expect("save profile");
        store.save_goal("u1", &goal).expect("save goal");
    }

    let store = SqliteLifeStore::open(&path).expect("reopen");
    assert_eq!(
        store.load_profile("u1").expect("load"),
        Some(full_profile())
    );
    assert_eq!(store.load_goal("u1", goal.id).expect("load"), Some(goal));
}
