//! Serialized access to one audio device
//!
//! Device operations are asynchronous and may be requested concurrently by
//! user actions and the reconciliation loop. The engine runs them one at a
//! time through a lane that also owns the identity of the loaded asset, so a
//! `play` can refuse to start an asset that has since been replaced.

use crate::device::AudioDevice;
use crate::error::{PlaybackError, Result};
use selah_core::AssetHandle;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One playback channel
pub struct PlaybackEngine {
    name: &'static str,
    device: Arc<dyn AudioDevice>,
    lane: Mutex<Option<AssetHandle>>,
}

impl PlaybackEngine {
    /// Wrap a device; `name` is used in logs
    pub fn new(name: &'static str, device: Arc<dyn AudioDevice>) -> Self {
        Self {
            name,
            device,
            lane: Mutex::new(None),
        }
    }

    /// Load `asset`, releasing the previous one first
    ///
    /// On failure nothing is loaded.
    pub async fn load(&self, asset: &AssetHandle) -> Result<()> {
        let mut loaded = self.lane.lock().await;
        if let Some(previous) = loaded.take() {
            debug!("[{}] Releasing {}", self.name, previous);
            if let Err(e) = self.device.release().await {
                warn!("[{}] Failed to release {}: {}", self.name, previous, e);
            }
        }

        debug!("[{}] Loading {}", self.name, asset);
        self.device.load(asset).await?;
        *loaded = Some(asset.clone());
        Ok(())
    }

    /// Start playing `expected`
    ///
    /// Fails with [`PlaybackError::Superseded`] if another asset was loaded
    /// in the meantime.
    pub async fn play(&self, expected: &AssetHandle) -> Result<()> {
        let loaded = self.lane.lock().await;
        match loaded.as_ref() {
            Some(current) if current == expected => self.device.play().await,
            _ => Err(PlaybackError::Superseded),
        }
    }

    /// Resume whatever is loaded
    pub async fn resume(&self) -> Result<()> {
        let loaded = self.lane.lock().await;
        if loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        self.device.play().await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<()> {
        let loaded = self.lane.lock().await;
        if loaded.is_none() {
            return Ok(());
        }
        self.device.pause().await
    }

    /// Rewind the loaded asset
    pub async fn seek_to_start(&self) -> Result<()> {
        let loaded = self.lane.lock().await;
        if loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        self.device.seek_to_start().await
    }

    /// Stop and release the loaded asset, if any
    pub async fn stop(&self) -> Result<()> {
        self.stop_if(|| true).await.map(|_| ())
    }

    /// Stop and release, provided `still_wanted` holds once the lane is free
    ///
    /// Returns whether a stop was attempted. The check runs inside the lane,
    /// so a request that was overtaken cannot release a newer asset.
    pub async fn stop_if(&self, still_wanted: impl FnOnce() -> bool + Send) -> Result<bool> {
        let mut loaded = self.lane.lock().await;
        if !still_wanted() {
            return Ok(false);
        }
        if let Some(previous) = loaded.take() {
            debug!("[{}] Stopping {}", self.name, previous);
            self.device.pause().await?;
            self.device.release().await?;
        }
        Ok(true)
    }

    /// Set output volume
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        let _lane = self.lane.lock().await;
        self.device.set_volume(volume).await
    }

    /// Loop the loaded asset
    pub async fn set_looping(&self, looping: bool) -> Result<()> {
        let _lane = self.lane.lock().await;
        self.device.set_looping(looping).await
    }

    /// Set playback rate multiplier
    pub async fn set_rate(&self, rate: f32) -> Result<()> {
        let _lane = self.lane.lock().await;
        self.device.set_rate(rate).await
    }

    /// Asset currently loaded
    pub async fn loaded(&self) -> Option<AssetHandle> {
        self.lane.lock().await.clone()
    }

    /// Ground truth from the device
    pub fn is_playing(&self) -> bool {
        self.device.is_playing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceOp, SimulatedDevice};
    use std::time::Duration;

    fn asset(name: &str) -> AssetHandle {
        AssetHandle::File(name.into())
    }

    #[tokio::test]
    async fn load_releases_previous_asset() {
        let device = Arc::new(SimulatedDevice::new());
        let engine = PlaybackEngine::new("test", device.clone());

        engine.load(&asset("a.mp3")).await.unwrap();
        engine.load(&asset("b.mp3")).await.unwrap();

        assert_eq!(
            device.ops(),
            vec![
                DeviceOp::Load(asset("a.mp3")),
                DeviceOp::Release,
                DeviceOp::Load(asset("b.mp3")),
            ]
        );
        assert_eq!(engine.loaded().await, Some(asset("b.mp3")));
    }

    #[tokio::test]
    async fn play_refuses_replaced_asset() {
        let device = Arc::new(SimulatedDevice::new());
        let engine = PlaybackEngine::new("test", device.clone());

        engine.load(&asset("a.mp3")).await.unwrap();
        engine.load(&asset("b.mp3")).await.unwrap();

        assert!(matches!(
            engine.play(&asset("a.mp3")).await,
            Err(PlaybackError::Superseded)
        ));
        assert!(!engine.is_playing());

        engine.play(&asset("b.mp3")).await.unwrap();
        assert!(engine.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn operations_run_in_request_order() {
        let device = Arc::new(SimulatedDevice::new());
        device.set_load_delay(asset("slow.mp3"), Duration::from_secs(2));
        let engine = Arc::new(PlaybackEngine::new("test", device.clone()));

        let slow = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.load(&asset("slow.mp3")).await })
        };
        tokio::task::yield_now().await;
        engine.load(&asset("fast.mp3")).await.unwrap();
        slow.await.unwrap().unwrap();

        // The second load waited for the first and replaced it
        assert_eq!(engine.loaded().await, Some(asset("fast.mp3")));
        assert_eq!(device.loaded(), Some(asset("fast.mp3")));
    }

    #[tokio::test]
    async fn failed_load_leaves_nothing_loaded() {
        let device = Arc::new(SimulatedDevice::new());
        device.fail_loads_of(asset("bad.mp3"));
        let engine = PlaybackEngine::new("test", device.clone());

        engine.load(&asset("a.mp3")).await.unwrap();
        assert!(engine.load(&asset("bad.mp3")).await.is_err());
        assert_eq!(engine.loaded().await, None);
        assert!(matches!(
            engine.resume().await,
            Err(PlaybackError::NothingLoaded)
        ));
    }

    #[tokio::test]
    async fn stop_releases() {
        let device = Arc::new(SimulatedDevice::new());
        let engine = PlaybackEngine::new("test", device.clone());

        engine.load(&asset("a.mp3")).await.unwrap();
        engine.play(&asset("a.mp3")).await.unwrap();
        engine.stop().await.unwrap();

        assert!(!engine.is_playing());
        assert_eq!(device.loaded(), None);

        // Stopping an idle engine is a no-op
        device.clear_ops();
        engine.stop().await.unwrap();
        assert!(device.ops().is_empty());
    }

    #[tokio::test]
    async fn stop_if_respects_condition() {
        let device = Arc::new(SimulatedDevice::new());
        let engine = PlaybackEngine::new("test", device.clone());

        engine.load(&asset("a.mp3")).await.unwrap();
        assert!(!engine.stop_if(|| false).await.unwrap());
        assert_eq!(device.loaded(), Some(asset("a.mp3")));

        assert!(engine.stop_if(|| true).await.unwrap());
        assert_eq!(device.loaded(), None);
    }
}
