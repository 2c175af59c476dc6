//! Ambient background music
//!
//! A looping track on its own engine, played under narration at a reduced
//! volume. It follows the session: it starts when narration becomes active
//! and stops a short grace period after narration goes quiet, so the gap
//! between two quotes does not cut the music. Turning the setting off stops
//! it at once.

use crate::device::AudioDevice;
use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::types::PlaybackConfig;
use selah_core::AssetHandle;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct MusicState {
    enabled: bool,
    session_active: bool,
    pending_stop: Option<JoinHandle<()>>,
    epoch: u64,
}

impl MusicState {
    fn cancel_pending_stop(&mut self) {
        self.epoch += 1;
        if let Some(handle) = self.pending_stop.take() {
            handle.abort();
        }
    }
}

/// Background music controller
pub struct BackgroundMusic {
    engine: PlaybackEngine,
    asset: Option<AssetHandle>,
    volume: f32,
    grace: Duration,
    state: Mutex<MusicState>,
}

impl BackgroundMusic {
    /// Create a controller for `asset`
    ///
    /// `enabled` is the persisted setting; it is adopted without starting
    /// anything. Without an asset the controller never plays.
    pub fn new(
        device: Arc<dyn AudioDevice>,
        asset: Option<AssetHandle>,
        enabled: bool,
        config: &PlaybackConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            engine: PlaybackEngine::new("music", device),
            asset,
            volume: config.music_volume.clamp(0.0, 1.0),
            grace: config.music_stop_grace(),
            state: Mutex::new(MusicState {
                enabled,
                ..MusicState::default()
            }),
        })
    }

    /// Whether the setting is on
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Whether music is audible
    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Whether a debounced stop is waiting
    pub fn stop_pending(&self) -> bool {
        self.lock().pending_stop.is_some()
    }

    /// Apply the user setting
    ///
    /// Turning it on starts the music regardless of the session; turning it
    /// off stops it immediately and cancels any pending stop.
    pub async fn set_enabled(&self, enabled: bool) {
        {
            let mut state = self.lock();
            if state.enabled == enabled {
                return;
            }
            state.enabled = enabled;
            state.cancel_pending_stop();
        }

        if enabled {
            self.start().await;
        } else {
            self.stop().await;
        }
    }

    /// Follow the narration session
    ///
    /// `session_active` is true while narration plays within a non-empty
    /// playlist. Only edges matter: a rising edge starts the music and
    /// cancels a pending stop, a falling edge schedules a stop after the
    /// grace period.
    pub async fn observe(self: &Arc<Self>, session_active: bool) {
        {
            let mut state = self.lock();
            let was_active = std::mem::replace(&mut state.session_active, session_active);
            if !state.enabled || was_active == session_active {
                return;
            }

            if !session_active {
                self.schedule_stop(&mut state);
                return;
            }
            state.cancel_pending_stop();
        }

        self.start().await;
    }

    fn schedule_stop(self: &Arc<Self>, state: &mut MusicState) {
        state.cancel_pending_stop();
        let epoch = state.epoch;
        let grace = self.grace;
        let this = Arc::clone(self);

        debug!("Background music stop in {:?}", grace);
        state.pending_stop = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let due = {
                let mut state = this.lock();
                let due = state.epoch == epoch && state.enabled && !state.session_active;
                if due {
                    state.pending_stop = None;
                }
                due
            };
            if due {
                this.stop().await;
            }
        }));
    }

    async fn start(&self) {
        let Some(asset) = self.asset.as_ref() else {
            debug!("No background music configured");
            return;
        };

        match self.play_looped(asset).await {
            Ok(()) => info!("Background music started"),
            Err(e) => warn!("Failed to start background music: {}", e),
        }
    }

    async fn play_looped(&self, asset: &AssetHandle) -> Result<()> {
        if self.engine.loaded().await.as_ref() != Some(asset) {
            self.engine.load(asset).await?;
        }
        self.engine.set_looping(true).await?;
        self.engine.set_volume(self.volume).await?;
        self.engine.play(asset).await
    }

    async fn stop(&self) {
        match self.engine.stop().await {
            Ok(()) => info!("Background music stopped"),
            Err(e) => warn!("Failed to stop background music: {}", e),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MusicState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
