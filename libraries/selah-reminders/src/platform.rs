//! Notification platform seam

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Permission to post notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Granted
    Granted,
    /// Refused by the user
    Denied,
    /// Not asked yet
    Undetermined,
}

/// Fires every day at a local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTrigger {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
}

/// A repeating local notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Play the default sound
    pub sound: bool,
    /// When it fires
    pub trigger: DailyTrigger,
}

/// Platform notification service
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    /// Current permission
    async fn permission_status(&self) -> Result<PermissionStatus>;

    /// Ask the user for permission
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Remove every scheduled reminder
    async fn cancel_all(&self) -> Result<()>;

    /// Schedule a reminder, returning its platform id
    async fn schedule(&self, request: ReminderRequest) -> Result<String>;

    /// Number of scheduled reminders
    async fn scheduled_count(&self) -> Result<usize>;
}

/// Platform that keeps reminders in memory
///
/// Used by the command-line front end, which has no notification service.
#[derive(Debug)]
pub struct InMemoryPlatform {
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    scheduled: Mutex<Vec<ReminderRequest>>,
}

impl InMemoryPlatform {
    /// Platform that grants permission when asked
    pub fn granting() -> Self {
        Self {
            permission: Mutex::new(PermissionStatus::Undetermined),
            grant_on_request: true,
            scheduled: Mutex::new(Vec::new()),
        }
    }

    /// Platform whose user refuses permission
    pub fn denying() -> Self {
        Self {
            grant_on_request: false,
            ..Self::granting()
        }
    }

    /// Reminders currently scheduled
    pub fn scheduled(&self) -> Vec<ReminderRequest> {
        lock(&self.scheduled).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl NotificationPlatform for InMemoryPlatform {
    async fn permission_status(&self) -> Result<PermissionStatus> {
        Ok(*lock(&self.permission))
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        let mut permission = lock(&self.permission);
        if *permission == PermissionStatus::Undetermined {
            *permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        Ok(*permission)
    }

    async fn cancel_all(&self) -> Result<()> {
        lock(&self.scheduled).clear();
        Ok(())
    }

    async fn schedule(&self, request: ReminderRequest) -> Result<String> {
        let mut scheduled = lock(&self.scheduled);
        scheduled.push(request);
        Ok(format!("reminder-{}", scheduled.len()))
    }

    async fn scheduled_count(&self) -> Result<usize> {
        Ok(lock(&self.scheduled).len())
    }
}
