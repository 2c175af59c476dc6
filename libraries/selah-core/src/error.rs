/// Core error types for Selah
use thiserror::Error;

/// Result type alias using `SelahError`
pub type Result<T> = std::result::Result<T, SelahError>;

/// Core error type for Selah
#[derive(Error, Debug)]
pub enum SelahError {
    /// Persistence-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Quote not found
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Catalog content is malformed
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SelahError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
