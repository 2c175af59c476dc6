//! Periodic reconciliation
//!
//! Polls the device through [`SessionController::reconcile_tick`] and feeds
//! the resulting session activity to the background music.

use crate::background::BackgroundMusic;
use crate::controller::SessionController;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Running reconciliation loop; stops when dropped
pub struct PlaybackMonitor {
    handle: JoinHandle<()>,
}

impl PlaybackMonitor {
    /// Start polling every `interval`
    pub fn spawn(
        controller: Arc<SessionController>,
        music: Option<Arc<BackgroundMusic>>,
        interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            info!("Playback monitor started ({:?} interval)", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if let Some(action) = controller.reconcile_tick().await {
                    debug!("Reconciled: {:?}", action);
                }
                if let Some(music) = &music {
                    music.observe(controller.snapshot().is_active()).await;
                }
            }
        });

        Self { handle }
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop polling
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PlaybackMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
