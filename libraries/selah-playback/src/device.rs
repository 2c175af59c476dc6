//! Platform-agnostic audio device trait
//!
//! Abstracts the platform player that actually renders narration and music.

use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use selah_core::AssetHandle;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Platform audio player for a single channel
///
/// Implementors wrap whatever the platform offers. Every operation may
/// suspend, and `is_playing` reports what the device is actually doing,
/// which may differ from what was last requested (the clip ended, the OS
/// interrupted playback, a headset was unplugged).
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Load an asset, replacing whatever was loaded
    async fn load(&self, asset: &AssetHandle) -> Result<()>;

    /// Release the loaded asset
    async fn release(&self) -> Result<()>;

    /// Start or resume playback of the loaded asset
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Rewind to the start of the loaded asset
    async fn seek_to_start(&self) -> Result<()>;

    /// Set output volume (0.0 - 1.0)
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Loop the loaded asset
    async fn set_looping(&self, looping: bool) -> Result<()>;

    /// Set playback rate multiplier
    async fn set_rate(&self, rate: f32) -> Result<()>;

    /// Whether audio is currently being rendered
    fn is_playing(&self) -> bool;
}

/// Operation recorded by [`SimulatedDevice`]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    /// `load`
    Load(AssetHandle),
    /// `release`
    Release,
    /// `play`
    Play,
    /// `pause`
    Pause,
    /// `seek_to_start`
    SeekToStart,
    /// `set_volume`
    SetVolume(f32),
    /// `set_looping`
    SetLooping(bool),
    /// `set_rate`
    SetRate(f32),
}

#[derive(Debug)]
struct SimState {
    loaded: Option<AssetHandle>,
    playing: bool,
    looping: bool,
    volume: f32,
    rate: f32,
    started_at: Option<Instant>,
    played: Duration,
    load_delays: HashMap<AssetHandle, Duration>,
    failing_loads: HashSet<AssetHandle>,
    fail_next_play: bool,
    ops: Vec<DeviceOp>,
}

impl SimState {
    fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|t| t.elapsed().mul_f32(self.rate))
            .unwrap_or_default();
        self.played + running
    }

    fn settle(&mut self, clip_length: Option<Duration>) {
        if !self.playing || self.looping {
            return;
        }
        if let Some(length) = clip_length {
            if self.position() >= length {
                self.playing = false;
                self.started_at = None;
                self.played = length;
            }
        }
    }
}

/// In-process device with no audio output
///
/// Keeps a virtual playhead driven by the tokio clock, so tests running
/// with a paused clock see clips end deterministically. Used by tests and
/// by the command-line front end.
#[derive(Debug)]
pub struct SimulatedDevice {
    clip_length: Option<Duration>,
    state: Mutex<SimState>,
}

impl SimulatedDevice {
    /// Device whose clips play until paused or finished manually
    pub fn new() -> Self {
        Self {
            clip_length: None,
            state: Mutex::new(SimState {
                loaded: None,
                playing: false,
                looping: false,
                volume: 1.0,
                rate: 1.0,
                started_at: None,
                played: Duration::ZERO,
                load_delays: HashMap::new(),
                failing_loads: HashSet::new(),
                fail_next_play: false,
                ops: Vec::new(),
            }),
        }
    }

    /// Device whose clips end after `length` of playback
    pub fn with_clip_length(length: Duration) -> Self {
        Self {
            clip_length: Some(length),
            ..Self::new()
        }
    }

    /// Make loads of `asset` take `delay`
    pub fn set_load_delay(&self, asset: AssetHandle, delay: Duration) {
        self.lock().load_delays.insert(asset, delay);
    }

    /// Make loads of `asset` fail
    pub fn fail_loads_of(&self, asset: AssetHandle) {
        self.lock().failing_loads.insert(asset);
    }

    /// Make the next `play` fail
    pub fn fail_next_play(&self) {
        self.lock().fail_next_play = true;
    }

    /// End the current clip as if it played to completion
    pub fn finish(&self) {
        let mut state = self.lock();
        state.playing = false;
        state.started_at = None;
        state.played = self.clip_length.unwrap_or_default();
    }

    /// Stop playback as if the OS interrupted it
    pub fn interrupt(&self) {
        let mut state = self.lock();
        state.played = state.position();
        state.playing = false;
        state.started_at = None;
    }

    /// Currently loaded asset
    pub fn loaded(&self) -> Option<AssetHandle> {
        self.lock().loaded.clone()
    }

    /// Current volume
    pub fn volume(&self) -> f32 {
        self.lock().volume
    }

    /// Current rate
    pub fn rate(&self) -> f32 {
        self.lock().rate
    }

    /// Whether looping is enabled
    pub fn is_looping(&self) -> bool {
        self.lock().looping
    }

    /// Operations performed so far
    pub fn ops(&self) -> Vec<DeviceOp> {
        self.lock().ops.clone()
    }

    /// Forget recorded operations
    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, op: DeviceOp) -> MutexGuard<'_, SimState> {
        trace!("Simulated device: {:?}", op);
        let mut state = self.lock();
        state.settle(self.clip_length);
        state.ops.push(op);
        state
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioDevice for SimulatedDevice {
    async fn load(&self, asset: &AssetHandle) -> Result<()> {
        let delay = {
            let mut state = self.record(DeviceOp::Load(asset.clone()));
            state.playing = false;
            state.started_at = None;
            state.load_delays.get(asset).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if state.failing_loads.contains(asset) {
            return Err(PlaybackError::device(format!("cannot decode {asset}")));
        }
        state.loaded = Some(asset.clone());
        state.played = Duration::ZERO;
        Ok(())
    }

    async fn release(&self) -> Result<()> {
        let mut state = self.record(DeviceOp::Release);
        state.loaded = None;
        state.playing = false;
        state.started_at = None;
        state.played = Duration::ZERO;
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut state = self.record(DeviceOp::Play);
        if state.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        if std::mem::take(&mut state.fail_next_play) {
            return Err(PlaybackError::device("playback refused"));
        }
        if state.playing {
            return Ok(());
        }
        if let Some(length) = self.clip_length {
            if !state.looping && state.played >= length {
                // At the end of the clip; stays silent until rewound
                return Ok(());
            }
        }
        state.playing = true;
        state.started_at = Some(Instant::now());
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut state = self.record(DeviceOp::Pause);
        state.played = state.position();
        state.playing = false;
        state.started_at = None;
        Ok(())
    }

    async fn seek_to_start(&self) -> Result<()> {
        let mut state = self.record(DeviceOp::SeekToStart);
        state.played = Duration::ZERO;
        if state.playing {
            state.started_at = Some(Instant::now());
        }
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        let mut state = self.record(DeviceOp::SetVolume(volume));
        state.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    async fn set_looping(&self, looping: bool) -> Result<()> {
        let mut state = self.record(DeviceOp::SetLooping(looping));
        state.looping = looping;
        Ok(())
    }

    async fn set_rate(&self, rate: f32) -> Result<()> {
        let mut state = self.record(DeviceOp::SetRate(rate));
        // Bank the playhead at the old rate before switching
        state.played = state.position();
        if state.started_at.is_some() {
            state.started_at = Some(Instant::now());
        }
        state.rate = rate;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        let mut state = self.lock();
        state.settle(self.clip_length);
        state.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> AssetHandle {
        AssetHandle::File(name.into())
    }

    #[tokio::test]
    async fn play_requires_loaded_asset() {
        let device = SimulatedDevice::new();
        assert!(matches!(
            device.play().await,
            Err(PlaybackError::NothingLoaded)
        ));

        device.load(&asset("a.mp3")).await.unwrap();
        device.play().await.unwrap();
        assert!(device.is_playing());

        device.pause().await.unwrap();
        assert!(!device.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn clip_ends_after_length() {
        let device = SimulatedDevice::with_clip_length(Duration::from_secs(2));
        device.load(&asset("a.mp3")).await.unwrap();
        device.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(device.is_playing());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!device.is_playing());

        // Resuming at the end stays silent until rewound
        device.play().await.unwrap();
        assert!(!device.is_playing());
        device.seek_to_start().await.unwrap();
        device.play().await.unwrap();
        assert!(device.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn looping_clip_never_ends() {
        let device = SimulatedDevice::with_clip_length(Duration::from_secs(1));
        device.load(&asset("music.mp3")).await.unwrap();
        device.set_looping(true).await.unwrap();
        device.play().await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(device.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn faster_rate_ends_sooner() {
        let device = SimulatedDevice::with_clip_length(Duration::from_secs(2));
        device.load(&asset("a.mp3")).await.unwrap();
        device.set_rate(2.0).await.unwrap();
        device.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!device.is_playing());
    }

    #[tokio::test]
    async fn injected_failures() {
        let device = SimulatedDevice::new();
        device.fail_loads_of(asset("bad.mp3"));
        assert!(device.load(&asset("bad.mp3")).await.is_err());
        assert_eq!(device.loaded(), None);

        device.load(&asset("good.mp3")).await.unwrap();
        device.fail_next_play();
        assert!(device.play().await.is_err());
        device.play().await.unwrap();
        assert!(device.is_playing());
    }
}
