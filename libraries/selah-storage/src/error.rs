/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Slot name contains characters that cannot be used as a file name
    #[error("Invalid slot name: {0}")]
    InvalidSlot(String),

    /// Stored document could not be decoded
    #[error("Corrupt document in slot {slot}: {reason}")]
    CorruptDocument { slot: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Setting value outside its allowed range
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a corrupt document error
    pub fn corrupt(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptDocument {
            slot: slot.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid setting error
    pub fn invalid_setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for selah_core::SelahError {
    fn from(err: StorageError) -> Self {
        selah_core::SelahError::storage(err.to_string())
    }
}
