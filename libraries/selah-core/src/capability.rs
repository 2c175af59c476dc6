//! Platform capability
//!
//! Platform features such as local notifications are probed once at startup
//! and the result is injected into the components that need it, instead of
//! checking the platform at every call site.

use serde::{Deserialize, Serialize};

/// Whether a platform feature can be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// The feature is available
    Supported,

    /// The feature is permanently unavailable on this platform
    Unsupported {
        /// Explanation shown to the user
        reason: String,
    },
}

impl Capability {
    /// Create an unsupported capability with an explanation
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Check if the feature is available
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported)
    }

    /// Explanation for an unsupported feature
    pub fn reason(&self) -> Option<&str> {
        match self {
            Capability::Supported => None,
            Capability::Unsupported { reason } => Some(reason),
        }
    }
}
