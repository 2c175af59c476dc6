//! Daily reminder scheduling
//!
//! Reminders are always rescheduled as a whole: existing ones are cancelled
//! first, then one repeating reminder is scheduled per enabled slot. The
//! body of each reminder is a randomly chosen quote.

use crate::error::{ReminderError, Result};
use crate::platform::{DailyTrigger, NotificationPlatform, PermissionStatus, ReminderRequest};
use selah_core::{Capability, ContentCatalog};
use selah_storage::{ReminderSlot, Settings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest notification body before truncation, in characters
pub const MAX_BODY_CHARS: usize = 100;

const FALLBACK_BODY: &str = "Take a quiet moment with today's teaching.";

/// Result of a reschedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    /// This many reminders are now scheduled
    Scheduled(usize),

    /// The user refused notifications; nothing is scheduled
    PermissionDenied,

    /// Notifications are not available on this platform
    Unsupported(String),
}

/// Shorten `text` for a notification body
pub fn truncate_body(text: &str) -> String {
    match text.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Body text from a random quote of `catalog`
pub fn random_quote_text(catalog: &dyn ContentCatalog) -> String {
    catalog
        .random_quote()
        .map(|quote| truncate_body(&quote.text))
        .unwrap_or_else(|| FALLBACK_BODY.to_string())
}

/// Schedules reminders through an injected platform
pub struct ReminderScheduler {
    capability: Capability,
    platform: Arc<dyn NotificationPlatform>,
    catalog: Arc<dyn ContentCatalog>,
}

impl ReminderScheduler {
    /// Create a scheduler; `capability` is resolved once by the host
    pub fn new(
        capability: Capability,
        platform: Arc<dyn NotificationPlatform>,
        catalog: Arc<dyn ContentCatalog>,
    ) -> Self {
        Self {
            capability,
            platform,
            catalog,
        }
    }

    /// Platform support for reminders
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Ask for permission unless already granted
    pub async fn ensure_permission(&self) -> Result<bool> {
        if !self.capability.is_supported() {
            return Ok(false);
        }

        let status = match self.platform.permission_status().await? {
            PermissionStatus::Granted => PermissionStatus::Granted,
            _ => self.platform.request_permission().await?,
        };
        Ok(status == PermissionStatus::Granted)
    }

    /// Replace all reminders with one per enabled slot
    pub async fn reschedule(&self, slots: &[ReminderSlot]) -> Result<ScheduleOutcome> {
        if let Capability::Unsupported { reason } = &self.capability {
            debug!("Reminders unsupported: {}", reason);
            return Ok(ScheduleOutcome::Unsupported(reason.clone()));
        }

        for slot in slots {
            if slot.hour > 23 || slot.minute > 59 {
                return Err(ReminderError::InvalidTime {
                    hour: slot.hour,
                    minute: slot.minute,
                });
            }
        }

        self.platform.cancel_all().await?;

        if !self.ensure_permission().await? {
            warn!("Notification permission not granted, reminders disabled");
            return Ok(ScheduleOutcome::PermissionDenied);
        }

        let mut scheduled = 0;
        for slot in slots.iter().filter(|s| s.enabled) {
            let request = ReminderRequest {
                title: slot.label.clone(),
                body: random_quote_text(self.catalog.as_ref()),
                sound: true,
                trigger: DailyTrigger {
                    hour: slot.hour,
                    minute: slot.minute,
                },
            };
            let id = self.platform.schedule(request).await?;
            debug!(
                "Scheduled reminder {} at {:02}:{:02} ({})",
                slot.label, slot.hour, slot.minute, id
            );
            scheduled += 1;
        }

        info!("{} daily reminders scheduled", scheduled);
        Ok(ScheduleOutcome::Scheduled(scheduled))
    }

    /// Follow the user's notification settings
    pub async fn apply_settings(&self, settings: &Settings) -> Result<ScheduleOutcome> {
        if settings.daily_notifications {
            self.reschedule(&settings.reminders).await
        } else if let Capability::Unsupported { reason } = &self.capability {
            Ok(ScheduleOutcome::Unsupported(reason.clone()))
        } else {
            self.cancel_all().await?;
            Ok(ScheduleOutcome::Scheduled(0))
        }
    }

    /// Remove every reminder
    pub async fn cancel_all(&self) -> Result<()> {
        if !self.capability.is_supported() {
            return Ok(());
        }
        self.platform.cancel_all().await?;
        info!("All reminders cancelled");
        Ok(())
    }

    /// Reminders currently scheduled
    pub async fn scheduled_count(&self) -> Result<usize> {
        if !self.capability.is_supported() {
            return Ok(0);
        }
        self.platform.scheduled_count().await
    }
}
