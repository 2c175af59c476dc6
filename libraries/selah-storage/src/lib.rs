//! Selah Storage
//!
//! Persisted state for Selah.
//!
//! This crate provides:
//! - Slot-based key-value persistence (`KeyValueStore`, file and memory backends)
//! - The player document (session, favorites, history, streak)
//! - The settings document and its write-through `SettingsStore`
//! - Favorites, bounded history and the daily engagement tracker
//!
//! # Architecture
//!
//! State objects are plain owned values. Whoever owns them (the session
//! controller, the settings store) decides when to persist; every write
//! re-serializes the whole document.
//!
//! # Example
//!
//! ```rust,no_run
//! use selah_storage::{JsonFileStore, PlayerDocument, Slot, PLAYER_SLOT};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonFileStore::open("/var/lib/selah").await?);
//! let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
//! let document = slot.load().await?;
//! println!("{} favorites", document.favorites.len());
//! # Ok(())
//! # }
//! ```

mod error;

pub mod documents;
pub mod favorites;
pub mod history;
pub mod kv;
pub mod settings;
pub mod streak;

pub use documents::{PersistedSession, PlayerDocument, Slot, PLAYER_SLOT, SETTINGS_SLOT};
pub use error::{Result, StorageError};
pub use favorites::Favorites;
pub use history::{History, DEFAULT_HISTORY_SIZE};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use settings::{default_reminders, ReminderSlot, Settings, SettingsStore};
pub use streak::{
    Celebration, DailyProgress, EngagementTracker, StreakData, StreakTier, DEFAULT_DAILY_GOAL,
    DEFAULT_PROGRESS_WINDOW,
};
