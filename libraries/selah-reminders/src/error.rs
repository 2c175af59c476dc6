//! Error types for reminder scheduling

use thiserror::Error;

/// Reminder errors
#[derive(Debug, Error)]
pub enum ReminderError {
    /// The notification platform rejected a request
    #[error("Notification platform error: {0}")]
    Platform(String),

    /// A reminder slot is not a valid time of day
    #[error("Invalid reminder time {hour:02}:{minute:02}")]
    InvalidTime {
        /// Hour
        hour: u8,
        /// Minute
        minute: u8,
    },
}

impl ReminderError {
    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }
}

/// Result type for reminder operations
pub type Result<T> = std::result::Result<T, ReminderError>;
