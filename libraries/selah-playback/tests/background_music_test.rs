//! Background music lifecycle tests
//!
//! Run on a paused clock so the stop grace period is exact.

use selah_core::AssetHandle;
use selah_playback::{BackgroundMusic, DeviceOp, PlaybackConfig, SimulatedDevice};
use std::sync::Arc;
use std::time::Duration;

fn music_asset() -> AssetHandle {
    AssetHandle::File("background.mp3".into())
}

fn music(enabled: bool) -> (Arc<BackgroundMusic>, Arc<SimulatedDevice>) {
    let device = Arc::new(SimulatedDevice::new());
    let music = BackgroundMusic::new(
        device.clone(),
        Some(music_asset()),
        enabled,
        &PlaybackConfig::default(),
    );
    (music, device)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn session_start_plays_looped_at_reduced_volume() {
    let (music, device) = music(true);
    assert!(!music.is_playing());

    music.observe(true).await;

    assert!(music.is_playing());
    assert_eq!(device.loaded(), Some(music_asset()));
    assert!(device.is_looping());
    assert_eq!(device.volume(), 0.3);
}

#[tokio::test(start_paused = true)]
async fn stop_waits_for_grace_period() {
    let (music, device) = music(true);
    music.observe(true).await;
    music.observe(false).await;

    assert!(music.stop_pending());
    advance(900).await;
    assert!(music.is_playing());

    advance(200).await;
    assert!(!music.is_playing());
    assert!(!music.stop_pending());
    assert_eq!(device.loaded(), None);
}

#[tokio::test(start_paused = true)]
async fn short_gap_does_not_interrupt() {
    let (music, device) = music(true);
    music.observe(true).await;
    device.clear_ops();

    // Gap between two quotes
    music.observe(false).await;
    advance(500).await;
    music.observe(true).await;
    assert!(!music.stop_pending());

    advance(3_000).await;
    assert!(music.is_playing());
    assert!(!device.ops().contains(&DeviceOp::Release));
}

#[tokio::test(start_paused = true)]
async fn repeated_observations_are_edges_only() {
    let (music, device) = music(true);
    music.observe(true).await;
    device.clear_ops();

    music.observe(true).await;
    music.observe(true).await;
    assert!(device.ops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn disabling_stops_immediately() {
    let (music, device) = music(true);
    music.observe(true).await;

    music.set_enabled(false).await;
    assert!(!music.is_playing());
    assert_eq!(device.loaded(), None);
}

#[tokio::test(start_paused = true)]
async fn disabling_cancels_pending_stop() {
    let (music, _device) = music(true);
    music.observe(true).await;
    music.observe(false).await;
    assert!(music.stop_pending());

    music.set_enabled(false).await;
    assert!(!music.is_playing());
    assert!(!music.stop_pending());

    // Re-enabling inside the old grace window is not undone by the old timer
    music.set_enabled(true).await;
    advance(2_000).await;
    assert!(music.is_playing());
}

#[tokio::test(start_paused = true)]
async fn enabling_starts_regardless_of_session() {
    let (music, _device) = music(false);
    music.observe(false).await;
    assert!(!music.is_enabled());

    music.set_enabled(true).await;
    assert!(music.is_enabled());
    assert!(music.is_playing());
}

#[tokio::test(start_paused = true)]
async fn disabled_music_ignores_session() {
    let (music, device) = music(false);
    music.observe(true).await;
    music.observe(false).await;
    advance(2_000).await;

    assert!(!music.is_playing());
    assert!(device.ops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_asset_never_plays() {
    let device = Arc::new(SimulatedDevice::new());
    let music = BackgroundMusic::new(device.clone(), None, true, &PlaybackConfig::default());

    music.observe(true).await;
    assert!(!music.is_playing());
    assert!(device.ops().is_empty());
}
