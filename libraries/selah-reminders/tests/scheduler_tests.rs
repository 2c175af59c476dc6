//! Reminder scheduler tests against a mocked notification platform

use async_trait::async_trait;
use mockall::{mock, Sequence};
use selah_core::{Capability, Quote, StaticCatalog};
use selah_reminders::{
    default_reminders, InMemoryPlatform, NotificationPlatform, PermissionStatus, ReminderError,
    ReminderRequest, ReminderScheduler, ReminderSlot, Result, ScheduleOutcome,
};
use selah_storage::Settings;
use std::sync::Arc;

mock! {
    Platform {}

    #[async_trait]
    impl NotificationPlatform for Platform {
        async fn permission_status(&self) -> Result<PermissionStatus>;
        async fn request_permission(&self) -> Result<PermissionStatus>;
        async fn cancel_all(&self) -> Result<()>;
        async fn schedule(&self, request: ReminderRequest) -> Result<String>;
        async fn scheduled_count(&self) -> Result<usize>;
    }
}

fn catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new(
        vec![Quote::new("1", "x".repeat(140), "Faith")],
        vec![],
    ))
}

fn scheduler(platform: MockPlatform) -> ReminderScheduler {
    ReminderScheduler::new(Capability::Supported, Arc::new(platform), catalog())
}

#[tokio::test]
async fn schedules_one_reminder_per_enabled_slot() {
    let mut platform = MockPlatform::new();
    let mut seq = Sequence::new();

    platform
        .expect_cancel_all()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    platform
        .expect_permission_status()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(PermissionStatus::Granted));
    platform.expect_request_permission().never();
    platform
        .expect_schedule()
        .withf(|r| r.sound && r.body.ends_with("...") && r.body.chars().count() == 103)
        .times(2)
        .in_sequence(&mut seq)
        .returning(|r| Ok(format!("{:02}{:02}", r.trigger.hour, r.trigger.minute)));

    let mut slots = default_reminders();
    slots[1].enabled = false;

    let outcome = scheduler(platform).reschedule(&slots).await.unwrap();
    assert_eq!(outcome, ScheduleOutcome::Scheduled(2));
}

#[tokio::test]
async fn requests_permission_when_not_granted() {
    let mut platform = MockPlatform::new();
    platform.expect_cancel_all().returning(|| Ok(()));
    platform
        .expect_permission_status()
        .returning(|| Ok(PermissionStatus::Undetermined));
    platform
        .expect_request_permission()
        .times(1)
        .returning(|| Ok(PermissionStatus::Granted));
    platform
        .expect_schedule()
        .times(3)
        .returning(|_| Ok("id".to_string()));

    let outcome = scheduler(platform)
        .reschedule(&default_reminders())
        .await
        .unwrap();
    assert_eq!(outcome, ScheduleOutcome::Scheduled(3));
}

#[tokio::test]
async fn denied_permission_schedules_nothing() {
    let mut platform = MockPlatform::new();
    platform.expect_cancel_all().times(1).returning(|| Ok(()));
    platform
        .expect_permission_status()
        .returning(|| Ok(PermissionStatus::Denied));
    platform
        .expect_request_permission()
        .returning(|| Ok(PermissionStatus::Denied));
    platform.expect_schedule().never();

    let outcome = scheduler(platform)
        .reschedule(&default_reminders())
        .await
        .unwrap();
    assert_eq!(outcome, ScheduleOutcome::PermissionDenied);
}

#[tokio::test]
async fn unsupported_platform_is_never_called() {
    let mut platform = MockPlatform::new();
    platform.expect_cancel_all().never();
    platform.expect_permission_status().never();
    platform.expect_request_permission().never();
    platform.expect_schedule().never();
    platform.expect_scheduled_count().never();

    let scheduler = ReminderScheduler::new(
        Capability::unsupported("Notifications are not available on web"),
        Arc::new(platform),
        catalog(),
    );

    assert_eq!(
        scheduler.reschedule(&default_reminders()).await.unwrap(),
        ScheduleOutcome::Unsupported("Notifications are not available on web".to_string())
    );
    assert!(!scheduler.ensure_permission().await.unwrap());
    scheduler.cancel_all().await.unwrap();
    assert_eq!(scheduler.scheduled_count().await.unwrap(), 0);
}

#[tokio::test]
async fn platform_failure_is_reported() {
    let mut platform = MockPlatform::new();
    platform
        .expect_cancel_all()
        .returning(|| Err(ReminderError::platform("service unavailable")));
    platform.expect_schedule().never();

    let result = scheduler(platform).reschedule(&default_reminders()).await;
    assert!(matches!(result, Err(ReminderError::Platform(_))));
}

#[tokio::test]
async fn invalid_slot_is_rejected_before_cancelling() {
    let mut platform = MockPlatform::new();
    platform.expect_cancel_all().never();

    let slots = vec![ReminderSlot::new(24, 0, "Midnight")];
    let result = scheduler(platform).reschedule(&slots).await;
    assert!(matches!(
        result,
        Err(ReminderError::InvalidTime { hour: 24, .. })
    ));
}

#[tokio::test]
async fn settings_drive_scheduling() {
    let platform = Arc::new(InMemoryPlatform::granting());
    let scheduler = ReminderScheduler::new(Capability::Supported, platform.clone(), catalog());

    let mut settings = Settings::default();
    assert_eq!(
        scheduler.apply_settings(&settings).await.unwrap(),
        ScheduleOutcome::Scheduled(3)
    );
    assert_eq!(scheduler.scheduled_count().await.unwrap(), 3);

    let titles: Vec<String> = platform.scheduled().into_iter().map(|r| r.title).collect();
    assert_eq!(
        titles,
        vec!["Morning Reflection", "Midday Wisdom", "Evening Peace"]
    );

    // Rescheduling replaces rather than adds
    scheduler.apply_settings(&settings).await.unwrap();
    assert_eq!(scheduler.scheduled_count().await.unwrap(), 3);

    settings.daily_notifications = false;
    assert_eq!(
        scheduler.apply_settings(&settings).await.unwrap(),
        ScheduleOutcome::Scheduled(0)
    );
    assert_eq!(scheduler.scheduled_count().await.unwrap(), 0);
}
