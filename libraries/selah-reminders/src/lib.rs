//! Selah Reminders
//!
//! Daily reminder notifications for Selah.
//!
//! The platform notification service is reached through the
//! [`NotificationPlatform`] trait. Whether the platform supports
//! notifications at all is decided once by the host and passed in as a
//! [`Capability`](selah_core::Capability); an unsupported scheduler never
//! calls the platform.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;

pub mod platform;
pub mod scheduler;

pub use error::{ReminderError, Result};
pub use platform::{
    DailyTrigger, InMemoryPlatform, NotificationPlatform, PermissionStatus, ReminderRequest,
};
pub use scheduler::{
    random_quote_text, truncate_body, ReminderScheduler, ScheduleOutcome, MAX_BODY_CHARS,
};
pub use selah_storage::{default_reminders, ReminderSlot};
