//! User settings management
//!
//! Settings live in their own document under [`SETTINGS_SLOT`] and are
//! persisted after every mutation.
//!
//! # Example
//!
//! ```rust
//! use selah_storage::{MemoryStore, SettingsStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> selah_storage::Result<()> {
//! let settings = SettingsStore::load(Arc::new(MemoryStore::new())).await?;
//! let enabled = settings.toggle_background_music().await?;
//! assert!(enabled);
//! # Ok(())
//! # }
//! ```

use crate::documents::{Slot, SETTINGS_SLOT};
use crate::error::{Result, StorageError};
use crate::kv::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Slowest allowed narration speed
pub const MIN_PLAYBACK_SPEED: f32 = 0.5;

/// Fastest allowed narration speed
pub const MAX_PLAYBACK_SPEED: f32 = 2.0;

/// A daily reminder time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSlot {
    /// Hour of day (0-23)
    pub hour: u8,

    /// Minute of hour (0-59)
    pub minute: u8,

    /// Whether this reminder is scheduled
    pub enabled: bool,

    /// Notification title
    pub label: String,
}

impl ReminderSlot {
    /// Create an enabled reminder
    pub fn new(hour: u8, minute: u8, label: impl Into<String>) -> Self {
        Self {
            hour,
            minute,
            enabled: true,
            label: label.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.hour > 23 || self.minute > 59 {
            return Err(StorageError::invalid_setting(
                "reminders",
                format!("{:02}:{:02} is not a time of day", self.hour, self.minute),
            ));
        }
        Ok(())
    }
}

/// Morning, midday and evening reminders
pub fn default_reminders() -> Vec<ReminderSlot> {
    vec![
        ReminderSlot::new(8, 0, "Morning Reflection"),
        ReminderSlot::new(12, 0, "Midday Wisdom"),
        ReminderSlot::new(20, 0, "Evening Peace"),
    ]
}

/// Everything stored under [`SETTINGS_SLOT`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Dark theme
    pub is_dark_mode: bool,

    /// Narration speed multiplier
    pub playback_speed: f32,

    /// Looping ambient music under narration
    pub enable_background_music: bool,

    /// Daily reminder notifications
    pub daily_notifications: bool,

    /// Reminder times
    pub reminders: Vec<ReminderSlot>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            playback_speed: 1.0,
            enable_background_music: false,
            daily_notifications: true,
            reminders: default_reminders(),
        }
    }
}

/// Owned settings state with write-through persistence
pub struct SettingsStore {
    slot: Slot<Settings>,
    settings: Mutex<Settings>,
    write_lane: tokio::sync::Mutex<()>,
}

impl SettingsStore {
    /// Rehydrate settings from `store`
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let slot = Slot::new(store, SETTINGS_SLOT);
        let mut settings: Settings = slot.load().await?;
        if !(MIN_PLAYBACK_SPEED..=MAX_PLAYBACK_SPEED).contains(&settings.playback_speed) {
            let clamped = settings
                .playback_speed
                .clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
            warn!(
                "Stored playback speed {} is outside {}..={}, using {}",
                settings.playback_speed, MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED, clamped
            );
            settings.playback_speed = clamped;
        }
        debug!("Settings rehydrated: {:?}", settings);
        Ok(Self {
            slot,
            settings: Mutex::new(settings),
            write_lane: tokio::sync::Mutex::new(()),
        })
    }

    /// Snapshot of the current settings
    pub fn get(&self) -> Settings {
        self.lock().clone()
    }

    /// Flip dark mode, returning the new value
    pub async fn toggle_dark_mode(&self) -> Result<bool> {
        let value = self.update(|s| {
            s.is_dark_mode = !s.is_dark_mode;
            s.is_dark_mode
        });
        self.persist().await?;
        Ok(value)
    }

    /// Set narration speed
    pub async fn set_playback_speed(&self, speed: f32) -> Result<()> {
        if !(MIN_PLAYBACK_SPEED..=MAX_PLAYBACK_SPEED).contains(&speed) {
            return Err(StorageError::invalid_setting(
                "playbackSpeed",
                format!("{speed} is outside {MIN_PLAYBACK_SPEED}..={MAX_PLAYBACK_SPEED}"),
            ));
        }
        self.update(|s| s.playback_speed = speed);
        self.persist().await
    }

    /// Flip the background music setting, returning the new value
    pub async fn toggle_background_music(&self) -> Result<bool> {
        let value = self.update(|s| {
            s.enable_background_music = !s.enable_background_music;
            s.enable_background_music
        });
        self.persist().await?;
        Ok(value)
    }

    /// Flip daily notifications, returning the new value
    pub async fn toggle_daily_notifications(&self) -> Result<bool> {
        let value = self.update(|s| {
            s.daily_notifications = !s.daily_notifications;
            s.daily_notifications
        });
        self.persist().await?;
        Ok(value)
    }

    /// Replace the reminder times
    pub async fn set_reminders(&self, reminders: Vec<ReminderSlot>) -> Result<()> {
        for reminder in &reminders {
            reminder.validate()?;
        }
        self.update(|s| s.reminders = reminders);
        self.persist().await
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.settings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        f(&mut self.lock())
    }

    /// Write the latest state; the lane keeps an older snapshot from landing last
    async fn persist(&self) -> Result<()> {
        let _lane = self.write_lane.lock().await;
        let snapshot = self.get();
        self.slot.save(&snapshot).await
    }
}
