//! Selah - Playback Management
//!
//! Platform-agnostic narration session control for Selah.
//!
//! This crate provides:
//! - Playlist navigation (manual wraparound, non-wrapping auto-advance)
//! - A session controller that owns the current quote, favorites, history
//!   and daily engagement, persisting after every change
//! - Reconciliation of session state against device ground truth
//! - Ambient background music with a debounced stop
//! - A simulated audio device for tests and headless use
//!
//! # Architecture
//!
//! `selah-playback` knows nothing about the platform player. Audio output
//! is provided through the [`AudioDevice`] trait; each channel (narration,
//! music) is wrapped in a [`PlaybackEngine`] that serializes its
//! operations. The [`PlaybackMonitor`] polls the device and lets the
//! controller correct itself.
//!
//! # Example
//!
//! ```rust
//! use selah_core::{AssetHandle, MappedAssets, Quote};
//! use selah_playback::{
//!     FixedClock, PlayOutcome, PlaybackConfig, SessionController, SimulatedDevice,
//! };
//! use selah_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> selah_playback::Result<()> {
//! let quote = Quote::new("1", "Be still, and know that I am God.", "Peace");
//! let assets = MappedAssets::new(AssetHandle::File("default.jpg".into()))
//!     .with_audio("1", AssetHandle::File("command_1.mp3".into()));
//!
//! let controller = SessionController::rehydrate(
//!     PlaybackConfig::default(),
//!     Arc::new(SimulatedDevice::new()),
//!     Arc::new(assets),
//!     Arc::new(FixedClock::new(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())),
//!     Arc::new(MemoryStore::new()),
//! )
//! .await?;
//!
//! assert_eq!(controller.play_quote(quote, Vec::new()).await, PlayOutcome::Playing);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod background;
pub mod clock;
pub mod controller;
pub mod device;
pub mod engine;
pub mod error;
pub mod events;
pub mod monitor;
pub mod reconcile;
pub mod session;
pub mod types;

pub use background::BackgroundMusic;
pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{PlayOutcome, SessionController};
pub use device::{AudioDevice, DeviceOp, SimulatedDevice};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use monitor::PlaybackMonitor;
pub use reconcile::{reconcile, MonitorState, ReconcileAction, Reconciliation, TickInput};
pub use session::{Playlist, SessionSnapshot, SessionState, Transition};
pub use types::{PlaybackConfig, SessionStatus};
