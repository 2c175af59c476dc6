//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session status as presented to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No quote selected
    Idle,

    /// Narration is being loaded
    Loading,

    /// Narration audible
    Playing,

    /// Quote selected but silent (paused, finished, failed or no audio)
    Paused,
}

/// Configuration for the session controller and its companions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Reconciliation poll interval in milliseconds (default: 350)
    pub poll_interval_ms: u64,

    /// Maximum time a narration load may take in milliseconds (default: 15000)
    pub load_timeout_ms: u64,

    /// Background music stop debounce in milliseconds (default: 1000)
    pub music_stop_grace_ms: u64,

    /// Background music volume relative to narration (default: 0.3)
    pub music_volume: f32,

    /// Maximum history size (default: 20)
    pub history_size: usize,

    /// Plays needed to complete a day (default: 3)
    pub daily_goal: u32,

    /// Past days kept in the progress window (default: 30)
    pub progress_window: usize,
}

impl PlaybackConfig {
    /// Reconciliation poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Narration load timeout
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Background music stop debounce
    pub fn music_stop_grace(&self) -> Duration {
        Duration::from_millis(self.music_stop_grace_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 350,
            load_timeout_ms: 15_000,
            music_stop_grace_ms: 1_000,
            music_volume: 0.3,
            history_size: selah_storage::DEFAULT_HISTORY_SIZE,
            daily_goal: selah_storage::DEFAULT_DAILY_GOAL,
            progress_window: selah_storage::DEFAULT_PROGRESS_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(350));
        assert_eq!(config.load_timeout(), Duration::from_secs(15));
        assert_eq!(config.music_stop_grace(), Duration::from_secs(1));
        assert_eq!(config.music_volume, 0.3);
        assert_eq!(config.history_size, 20);
        assert_eq!(config.daily_goal, 3);
        assert_eq!(config.progress_window, 30);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"daily_goal": 5}"#).unwrap();
        assert_eq!(config.daily_goal, 5);
        assert_eq!(config.poll_interval_ms, 350);
    }
}
