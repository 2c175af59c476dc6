//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! Events are queued by the session controller and collected with
//! `drain_events()`.

use crate::types::SessionStatus;
use serde::{Deserialize, Serialize};

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Session status changed
    StateChanged {
        /// The new status
        status: SessionStatus,
    },

    /// A different quote became current
    QuoteChanged {
        /// ID of the new quote
        quote_id: String,
        /// ID of the previous quote (if any)
        previous_quote_id: Option<String>,
        /// Position in the playlist
        index: usize,
    },

    /// The current quote has no narration; it is shown but not played
    AudioUnavailable {
        /// ID of the quote
        quote_id: String,
    },

    /// Loading or starting narration failed
    PlaybackFailed {
        /// ID of the quote
        quote_id: String,
        /// Failure description
        message: String,
    },

    /// Narration finished playing naturally
    QuoteFinished {
        /// ID of the finished quote
        quote_id: String,
    },

    /// The last quote of the playlist finished
    PlaylistEnded,

    /// Today's listening goal was reached
    DailyGoalCompleted {
        /// Streak including today
        streak: u32,
        /// Completed days including today
        total_days: u32,
        /// Encouragement for this streak length
        message: String,
    },

    /// Favorite membership changed
    FavoriteToggled {
        /// ID of the quote
        quote_id: String,
        /// Whether it is now a favorite
        is_favorite: bool,
    },
}
