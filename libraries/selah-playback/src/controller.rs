//! Session controller - core orchestration
//!
//! Coordinates the narration session, playlist navigation, favorites,
//! history and daily engagement, and drives the narration engine.
//!
//! # Concurrency
//!
//! Every operation takes `&self`. Plain state lives behind a synchronous
//! mutex that is never held across an `.await`; device work goes through
//! the engine's lane. Each start of a quote bumps the session generation,
//! and a completion that arrives after a newer start is discarded instead of
//! being applied. Persistence runs through its own lane and snapshots the
//! state once inside it, so the last write always reflects the latest state.
//!
//! Engine failures never propagate to callers: they settle the session to
//! not-playing and are reported through [`PlayOutcome`] and events.

use crate::clock::Clock;
use crate::device::AudioDevice;
use crate::engine::PlaybackEngine;
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::reconcile::{reconcile, MonitorState, ReconcileAction, TickInput};
use crate::session::{Playlist, SessionSnapshot, SessionState, Transition};
use crate::types::{PlaybackConfig, SessionStatus};
use selah_core::{AssetHandle, AssetResolver, Quote};
use selah_storage::settings::{MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED};
use selah_storage::{
    EngagementTracker, Favorites, History, KeyValueStore, PersistedSession, PlayerDocument, Slot,
    StorageError, StreakData, StreakTier, PLAYER_SLOT,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// How a request to play narration ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Narration is playing
    Playing,

    /// The quote has no narration; it is current but silent
    NoAudio,

    /// Loading or starting failed; the session is not playing
    Failed(String),

    /// A newer request replaced this one
    Superseded,

    /// Nothing to do (empty playlist, nothing selected, already playing)
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    User,
    AutoAdvance,
}

struct ControllerState {
    session: SessionState,
    monitor: MonitorState,
    favorites: Favorites,
    history: History,
    engagement: EngagementTracker,
    playback_rate: f32,
    pending_ops: u32,
}

/// Marks a user command in flight until dropped
struct PendingOp<'a>(&'a SessionController);

impl Drop for PendingOp<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock_state();
        state.pending_ops = state.pending_ops.saturating_sub(1);
    }
}

/// Narration session owner
pub struct SessionController {
    config: PlaybackConfig,
    engine: PlaybackEngine,
    assets: Arc<dyn AssetResolver>,
    clock: Arc<dyn Clock>,
    slot: Slot<PlayerDocument>,
    state: Mutex<ControllerState>,
    events: Mutex<Vec<PlaybackEvent>>,
    write_lane: tokio::sync::Mutex<()>,
}

impl SessionController {
    /// Rehydrate from `store`
    ///
    /// The day rollover runs before anything else reads the streak. A
    /// restored session is never playing. An unreadable player document is
    /// discarded with a warning; other storage errors are returned.
    pub async fn rehydrate(
        config: PlaybackConfig,
        device: Arc<dyn AudioDevice>,
        assets: Arc<dyn AssetResolver>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
        let document = match slot.load().await {
            Ok(document) => document,
            Err(StorageError::CorruptDocument { slot, reason }) => {
                warn!("Discarding unreadable {} document: {}", slot, reason);
                PlayerDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        let PlayerDocument {
            session,
            favorites,
            mut history,
            streak_data,
        } = document;

        history.set_max_size(config.history_size);
        let mut engagement =
            EngagementTracker::new(streak_data, config.daily_goal, config.progress_window);
        let rolled_over = engagement.reconcile_day(clock.today());

        let session = SessionState::restore(
            session.current_quote,
            session.current_playlist,
            session.current_index,
        );

        info!(
            "Player rehydrated: {} favorites, {} in history, streak {}",
            favorites.len(),
            history.len(),
            engagement.data().current_streak
        );

        let controller = Self {
            config,
            engine: PlaybackEngine::new("narration", device),
            assets,
            clock,
            slot,
            state: Mutex::new(ControllerState {
                session,
                monitor: MonitorState::default(),
                favorites,
                history,
                engagement,
                playback_rate: 1.0,
                pending_ops: 0,
            }),
            events: Mutex::new(Vec::new()),
            write_lane: tokio::sync::Mutex::new(()),
        };

        if rolled_over {
            controller.persist().await;
        }
        Ok(controller)
    }

    /// Configuration in use
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Session =====

    /// Make `quote` current within `playlist` and play its narration
    ///
    /// An empty `playlist` plays the quote on its own. If `quote` is not in
    /// `playlist`, playback starts at the first position.
    pub async fn play_quote(&self, quote: Quote, playlist: Vec<Quote>) -> PlayOutcome {
        self.start(Playlist::new(playlist, &quote), Origin::User)
            .await
    }

    /// Pause narration; returns `false` if nothing was playing
    pub async fn pause_quote(&self) -> bool {
        let _op = {
            let mut state = self.lock_state();
            if !state.session.is_playing() {
                return false;
            }
            state.session.apply(Transition::SetPlaying(false));
            self.emit(PlaybackEvent::StateChanged {
                status: state.session.status(),
            });
            self.begin_op(&mut state)
        };

        if let Err(e) = self.engine.pause().await {
            // The next poll brings the session back in line with the device
            warn!("Failed to pause narration: {}", e);
        }
        true
    }

    /// Resume narration of the current quote
    ///
    /// Narration that already played to its end restarts from the
    /// beginning. If nothing is loaded (after a restart of the app, or after
    /// a failure) the current quote is started afresh.
    pub async fn resume_quote(&self) -> PlayOutcome {
        let plan = {
            let mut state = self.lock_state();
            if state.session.current_quote().is_none()
                || state.session.is_playing()
                || state.session.is_loading()
            {
                return PlayOutcome::Skipped;
            }

            if state.session.audio_available() {
                let rewind = state.session.at_end();
                state.session.apply(Transition::SetPlaying(true));
                self.emit(PlaybackEvent::StateChanged {
                    status: state.session.status(),
                });
                Ok((
                    state.session.generation(),
                    rewind,
                    self.begin_op(&mut state),
                ))
            } else {
                Err(state.session.playlist().clone())
            }
        };

        let (generation, rewind, _op) = match plan {
            Ok(plan) => plan,
            Err(playlist) => return self.start(playlist, Origin::User).await,
        };

        let result = async {
            if rewind {
                self.engine.seek_to_start().await?;
            }
            self.engine.resume().await
        }
        .await;

        let restart = {
            let mut state = self.lock_state();
            if state.session.generation() != generation {
                return PlayOutcome::Superseded;
            }
            match result {
                Ok(()) => return PlayOutcome::Playing,
                Err(PlaybackError::NothingLoaded) => {
                    debug!("Nothing loaded on resume, restarting current quote");
                    state.session.playlist().clone()
                }
                Err(e) => {
                    warn!("Failed to resume narration: {}", e);
                    state.session.apply(Transition::Failed);
                    self.emit(PlaybackEvent::StateChanged {
                        status: state.session.status(),
                    });
                    return PlayOutcome::Failed(e.to_string());
                }
            }
        };
        self.start(restart, Origin::User).await
    }

    /// Play the next quote, wrapping to the start
    pub async fn next_quote(&self) -> PlayOutcome {
        self.step(Playlist::advance).await
    }

    /// Play the previous quote, wrapping to the end
    pub async fn previous_quote(&self) -> PlayOutcome {
        self.step(Playlist::retreat).await
    }

    /// Stop narration and clear the session
    pub async fn clear_current_quote(&self) {
        let generation = {
            let mut state = self.lock_state();
            state.session.apply(Transition::Cleared);
            state.monitor = MonitorState::default();
            self.emit(PlaybackEvent::StateChanged {
                status: SessionStatus::Idle,
            });
            state.session.generation()
        };

        if let Err(e) = self
            .engine
            .stop_if(|| self.is_current(generation))
            .await
        {
            warn!("Failed to stop narration: {}", e);
        }
        self.persist().await;
    }

    /// Current session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_state().session.snapshot()
    }

    /// Current status
    pub fn status(&self) -> SessionStatus {
        self.lock_state().session.status()
    }

    /// Narration speed for this and future quotes
    pub async fn set_playback_rate(&self, rate: f32) -> Result<()> {
        if !(MIN_PLAYBACK_SPEED..=MAX_PLAYBACK_SPEED).contains(&rate) {
            return Err(PlaybackError::InvalidOperation(format!(
                "playback rate {rate} is outside {MIN_PLAYBACK_SPEED}..={MAX_PLAYBACK_SPEED}"
            )));
        }
        self.lock_state().playback_rate = rate;
        if self.engine.loaded().await.is_some() {
            self.engine.set_rate(rate).await?;
        }
        Ok(())
    }

    /// Narration speed
    pub fn playback_rate(&self) -> f32 {
        self.lock_state().playback_rate
    }

    // ===== Favorites and history =====

    /// Flip favorite membership of `quote_id`, returning the new state
    pub async fn toggle_favorite(&self, quote_id: &str) -> bool {
        let is_favorite = {
            let mut state = self.lock_state();
            let is_favorite = state.favorites.toggle(quote_id);
            self.emit(PlaybackEvent::FavoriteToggled {
                quote_id: quote_id.to_string(),
                is_favorite,
            });
            is_favorite
        };
        self.persist().await;
        is_favorite
    }

    /// Whether `quote_id` is a favorite
    pub fn is_favorite(&self, quote_id: &str) -> bool {
        self.lock_state().favorites.contains(quote_id)
    }

    /// Favorite ids in insertion order
    pub fn favorites(&self) -> Vec<String> {
        self.lock_state().favorites.ids().to_vec()
    }

    /// Record that `quote_id` was viewed without playing it
    pub async fn view_quote(&self, quote_id: &str) {
        self.lock_state().history.push(quote_id);
        self.persist().await;
    }

    /// Recently viewed ids, most recent first
    pub fn history(&self) -> Vec<String> {
        self.lock_state()
            .history
            .get_all()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    // ===== Engagement =====

    /// Streak state, normalized to today
    pub async fn streak(&self) -> StreakData {
        let (data, rolled_over) = {
            let mut state = self.lock_state();
            let rolled_over = state.engagement.reconcile_day(self.clock.today());
            (state.engagement.data().clone(), rolled_over)
        };
        if rolled_over {
            self.persist().await;
        }
        data
    }

    /// Plays still needed today
    pub fn remaining_today(&self) -> u32 {
        let mut state = self.lock_state();
        state.engagement.reconcile_day(self.clock.today());
        state.engagement.remaining_today()
    }

    /// Encouragement tier for the current streak
    pub fn streak_tier(&self) -> StreakTier {
        self.lock_state().engagement.tier()
    }

    /// Acknowledge the pending goal celebration
    pub async fn dismiss_celebration(&self) {
        self.lock_state().engagement.dismiss_celebration();
        self.persist().await;
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut *self.lock_events())
    }

    // ===== Reconciliation =====

    /// Compare the session with the device and correct it
    ///
    /// Called periodically by the monitor. Detects finished narration,
    /// advances the playlist (without wrapping) or settles at its end, and
    /// syncs the playing flag when the device changed on its own.
    pub async fn reconcile_tick(&self) -> Option<ReconcileAction> {
        let device_playing = self.engine.is_playing();

        let (action, generation) = {
            let mut state = self.lock_state();
            let session = &state.session;
            let input = TickInput {
                device_playing,
                session_playing: session.is_playing(),
                operation_pending: session.is_loading() || state.pending_ops > 0,
                has_current: session.current_quote().is_some(),
                index: session.playlist().index(),
                playlist_len: session.playlist().len(),
            };

            let outcome = reconcile(state.monitor, input);
            state.monitor = outcome.state;

            let finished_id = state.session.current_quote().map(|q| q.id.clone());
            match outcome.action {
                Some(ReconcileAction::SyncPlaying(playing)) => {
                    if state.session.apply(Transition::SetPlaying(playing)) {
                        debug!("Session synced to device: playing={}", playing);
                        self.emit(PlaybackEvent::StateChanged {
                            status: state.session.status(),
                        });
                    }
                }
                Some(ReconcileAction::AdvanceToNext) => {
                    if let Some(quote_id) = finished_id {
                        self.emit(PlaybackEvent::QuoteFinished { quote_id });
                    }
                }
                Some(ReconcileAction::SettleStopped) => {
                    state.session.apply(Transition::Finished);
                    if let Some(quote_id) = finished_id {
                        info!("Playlist finished at quote {}", quote_id);
                        self.emit(PlaybackEvent::QuoteFinished { quote_id });
                    }
                    self.emit(PlaybackEvent::PlaylistEnded);
                    self.emit(PlaybackEvent::StateChanged {
                        status: state.session.status(),
                    });
                }
                None => {}
            }

            (outcome.action, state.session.generation())
        };

        if action == Some(ReconcileAction::AdvanceToNext) {
            self.advance_after_finish(generation).await;
        }
        action
    }

    // ===== Internals =====

    async fn step(&self, navigate: fn(&mut Playlist) -> Option<&Quote>) -> PlayOutcome {
        let playlist = {
            let state = self.lock_state();
            let mut playlist = state.session.playlist().clone();
            if navigate(&mut playlist).is_none() {
                return PlayOutcome::Skipped;
            }
            playlist
        };
        self.start(playlist, Origin::User).await
    }

    async fn advance_after_finish(&self, generation: u64) {
        let playlist = {
            let state = self.lock_state();
            if state.session.generation() != generation {
                return;
            }
            let mut playlist = state.session.playlist().clone();
            if !playlist.has_next() {
                return;
            }
            playlist.advance();
            playlist
        };

        let outcome = self.start(playlist, Origin::AutoAdvance).await;
        debug!("Auto-advance finished: {:?}", outcome);
    }

    async fn start(&self, playlist: Playlist, origin: Origin) -> PlayOutcome {
        let Some(quote) = playlist.current().cloned() else {
            return PlayOutcome::Skipped;
        };
        let audio = self.assets.resolve_audio(&quote.id);

        let (generation, rate) = {
            let mut state = self.lock_state();
            let previous_quote_id = state.session.current_quote().map(|q| q.id.clone());
            let index = playlist.index();

            state.session.apply(Transition::Begin {
                playlist,
                has_audio: audio.is_some(),
            });
            if origin == Origin::User {
                state.monitor.transitioning = false;
            }
            state.history.push(&quote.id);

            self.emit(PlaybackEvent::QuoteChanged {
                quote_id: quote.id.clone(),
                previous_quote_id,
                index,
            });
            self.emit(PlaybackEvent::StateChanged {
                status: state.session.status(),
            });
            (state.session.generation(), state.playback_rate)
        };
        self.persist().await;

        let Some(asset) = audio else {
            info!("No narration for quote {}, showing text only", quote.id);
            if let Err(e) = self
                .engine
                .stop_if(|| self.is_current(generation))
                .await
            {
                warn!("Failed to stop previous narration: {}", e);
            }
            self.emit(PlaybackEvent::AudioUnavailable { quote_id: quote.id });
            return PlayOutcome::NoAudio;
        };

        debug!("Starting narration for quote {} from {}", quote.id, asset);
        let result = self.load_and_play(&asset, rate, generation).await;

        let outcome = {
            let mut state = self.lock_state();
            if state.session.generation() != generation {
                debug!("Discarding stale result for quote {}", quote.id);
                return PlayOutcome::Superseded;
            }

            match result {
                Ok(()) => {
                    state.session.apply(Transition::Started);
                    self.emit(PlaybackEvent::StateChanged {
                        status: state.session.status(),
                    });
                    if let Some(celebration) = state.engagement.record_play(self.clock.today()) {
                        self.emit(PlaybackEvent::DailyGoalCompleted {
                            streak: celebration.streak,
                            total_days: celebration.total_days,
                            message: StreakTier::for_streak(celebration.streak)
                                .message()
                                .to_string(),
                        });
                    }
                    PlayOutcome::Playing
                }
                Err(e) => {
                    warn!("Narration for quote {} failed: {}", quote.id, e);
                    state.session.apply(Transition::Failed);
                    self.emit(PlaybackEvent::PlaybackFailed {
                        quote_id: quote.id.clone(),
                        message: e.to_string(),
                    });
                    self.emit(PlaybackEvent::StateChanged {
                        status: state.session.status(),
                    });
                    PlayOutcome::Failed(e.to_string())
                }
            }
        };

        self.persist().await;
        outcome
    }

    async fn load_and_play(&self, asset: &AssetHandle, rate: f32, generation: u64) -> Result<()> {
        let timeout = self.config.load_timeout();
        tokio::time::timeout(timeout, self.engine.load(asset))
            .await
            .map_err(|_| PlaybackError::LoadTimeout(timeout))??;

        if !self.is_current(generation) {
            return Err(PlaybackError::Superseded);
        }
        if let Err(e) = self.engine.set_rate(rate).await {
            warn!("Failed to apply playback rate {}: {}", rate, e);
        }
        self.engine.play(asset).await
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock_state().session.generation() == generation
    }

    fn begin_op(&self, state: &mut ControllerState) -> PendingOp<'_> {
        state.pending_ops += 1;
        PendingOp(self)
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<PlaybackEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, event: PlaybackEvent) {
        self.lock_events().push(event);
    }

    /// Write the latest player document; failures are logged
    async fn persist(&self) {
        let _lane = self.write_lane.lock().await;
        let document = {
            let state = self.lock_state();
            let (current_playlist, current_index) = state.session.playlist().clone().into_parts();
            PlayerDocument {
                session: PersistedSession {
                    current_quote: state.session.current_quote().cloned(),
                    current_playlist,
                    current_index,
                },
                favorites: state.favorites.clone(),
                history: state.history.clone(),
                streak_data: state.engagement.data().clone(),
            }
        };

        if let Err(e) = self.slot.save(&document).await {
            warn!("Failed to persist player state: {}", e);
        }
    }
}
