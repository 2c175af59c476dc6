/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session did not settle within {0:?}")]
    SettleTimeout(std::time::Duration),

    #[error(transparent)]
    Core(#[from] selah_core::SelahError),

    #[error(transparent)]
    Storage(#[from] selah_storage::StorageError),

    #[error(transparent)]
    Playback(#[from] selah_playback::PlaybackError),

    #[error(transparent)]
    Reminder(#[from] selah_reminders::ReminderError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
