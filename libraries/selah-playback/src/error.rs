//! Error types for playback management

use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No asset is currently loaded on the channel
    #[error("No asset loaded")]
    NothingLoaded,

    /// A newer request replaced the asset this operation was for
    #[error("Superseded by a newer request")]
    Superseded,

    /// Loading did not settle in time
    #[error("Load timed out after {0:?}")]
    LoadTimeout(Duration),

    /// Audio device error
    #[error("Audio device error: {0}")]
    Device(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Persistence error
    #[error(transparent)]
    Storage(#[from] selah_storage::StorageError),

    /// Core error
    #[error(transparent)]
    Core(#[from] selah_core::SelahError),
}

impl PlaybackError {
    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
