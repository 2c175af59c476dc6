//! Persisted documents
//!
//! Two independent documents are stored: one for playback state (session,
//! favorites, history, streak) and one for user settings. Each mutation
//! re-serializes its whole document.

use crate::error::{Result, StorageError};
use crate::favorites::Favorites;
use crate::history::History;
use crate::kv::KeyValueStore;
use crate::streak::StreakData;
use selah_core::Quote;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Slot holding the player document
pub const PLAYER_SLOT: &str = "player-storage";

/// Slot holding the settings document
pub const SETTINGS_SLOT: &str = "settings-storage";

/// Session as persisted between launches
///
/// Playing state is deliberately absent: a rehydrated session is never
/// playing because the audio device starts idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    /// Quote shown in the player
    pub current_quote: Option<Quote>,

    /// Active playlist
    pub current_playlist: Vec<Quote>,

    /// Position of the current quote in the playlist
    pub current_index: usize,
}

/// Everything stored under [`PLAYER_SLOT`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerDocument {
    /// Last session
    pub session: PersistedSession,

    /// Favorite quote ids
    pub favorites: Favorites,

    /// Recently viewed quote ids
    pub history: History,

    /// Daily goal and streak state
    pub streak_data: StreakData,
}

/// Typed view over one slot of a [`KeyValueStore`]
pub struct Slot<T> {
    store: Arc<dyn KeyValueStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Bind a slot name to a store
    pub fn new(store: Arc<dyn KeyValueStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    /// Slot name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Load the document, falling back to defaults if the slot is empty
    pub async fn load(&self) -> Result<T> {
        match self.store.get(self.name).await? {
            None => {
                debug!("Slot {} is empty, using defaults", self.name);
                Ok(T::default())
            }
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StorageError::corrupt(self.name, e.to_string())),
        }
    }

    /// Serialize and store the whole document
    pub async fn save(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(self.name, json).await
    }
}
