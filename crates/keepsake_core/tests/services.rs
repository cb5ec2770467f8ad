use chrono::NaiveDate;
use keepsake_core::{
    bootstrap_store_registry, AuthorizationState, BiographicalProfile, Countdown, EngineConfig,
    FixedClock, GoalEntry, GoalService, InMemoryNotificationGateway, LeadTime, LifeStore,
    ReminderService, ReminderSync, SpecialDateService,
};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn sqlite_store(dir: &tempfile::TempDir) -> Arc<dyn LifeStore> {
    let config = EngineConfig::from_json_str(&format!(
        r#"{{"storage_provider":"sqlite","database_path":{}}}"#,
        serde_json::to_string(&dir.path().join("keepsake.db")).expect("path json")
    ))
    .expect("config");
    bootstrap_store_registry(&config)
        .expect("bootstrap")
        .active()
        .expect("active store")
}

#[test]
fn special_date_reminder_goal_is_scheduled_and_swept() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = sqlite_store(&dir);
    let clock = Arc::new(FixedClock::new(date(2024, 3, 10), 5_000));
    let gateway = Arc::new(InMemoryNotificationGateway::new());
    let reminders = Arc::new(ReminderService::new(gateway.clone()));

    let special_dates = SpecialDateService::new(store.clone(), clock.clone());
    let goals = GoalService::new(store.clone(), reminders, clock);

    special_dates
        .save_profile("u1", &BiographicalProfile::new(date(1990, 3, 15)))
        .expect("save profile");
    let upcoming = special_dates.upcoming("u1", 30).expect("upcoming");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].countdown, Countdown::Days(5));

    let birthday = &upcoming[0].record;
    let spec = special_dates
        .reminder_for("u1", birthday.id, LeadTime::none())
        .expect("reminder")
        .expect("recurring birthday");
    let mut goal = GoalEntry::new("Buy a cake", spec.target);
    goal.origin = Some(birthday.id);
    goal.reminder = Some(spec);

    let sync = goals.save_goal("u1", &goal).expect("save goal");
    assert!(matches!(
        sync,
        ReminderSync::Scheduled { trigger_date, .. } if trigger_date == date(2024, 3, 15)
    ));
    assert_eq!(gateway.pending_count(), 1);

    let report = goals.sweep("u1").expect("sweep");
    assert_eq!(report.scheduled, vec![goal.id]);
    assert!(report.overdue.is_empty());
    assert_eq!(gateway.pending_count(), 1);

    goals.delete_goal("u1", goal.id).expect("delete");
    assert_eq!(gateway.pending_count(), 0);
    assert!(store.load_goals("u1").expect("goals").is_empty());
}

#[test]
fn denied_notifications_leave_goal_saved() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = sqlite_store(&dir);
    let gateway = Arc::new(InMemoryNotificationGateway::with_authorization(
        AuthorizationState::Denied,
    ));
    let goals = GoalService::new(
        store.clone(),
        Arc::new(ReminderService::new(gateway.clone())),
        Arc::new(FixedClock::at(date(2024, 5, 1))),
    );

    let mut goal = GoalEntry::new("Renew passport", date(2024, 6, 1));
    goal.reminder = Some(keepsake_core::ReminderSpec::one_time(
        date(2024, 6, 1),
        LeadTime::none(),
    ));
    let sync = goals.save_goal("u1", &goal).expect("save goal");
    assert_eq!(
        sync,
        ReminderSync::NotAuthorized {
            trigger_date: date(2024, 6, 1)
        }
    );
    assert_eq!(gateway.pending_count(), 0);
    assert_eq!(store.load_goal("u1", goal.id).expect("load"), Some(goal));
}
