//! Reconciliation of session state against device ground truth
//!
//! The session state is optimistic: it records what the user asked for. The
//! device reports what is actually happening. Each poll feeds both into
//! [`reconcile`], a pure function that decides whether the session must be
//! corrected, whether a finished quote should advance the playlist, or
//! whether the session should settle at the end of the playlist.
//!
//! Finished narration is detected as a falling edge of the device's playing
//! flag while the session still believes it is playing. While an automatic
//! advance is in flight the `transitioning` flag suppresses drift
//! correction, so the gap between two quotes is never mistaken for a pause.

/// State carried between polls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Device playing flag observed on the previous poll
    pub was_playing: bool,

    /// An automatic advance has been issued and not yet observed
    pub transitioning: bool,
}

/// One observation of session and device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Device is rendering audio
    pub device_playing: bool,

    /// Session believes narration is playing
    pub session_playing: bool,

    /// A load or user command is in flight
    pub operation_pending: bool,

    /// A quote is selected
    pub has_current: bool,

    /// Current playlist position
    pub index: usize,

    /// Playlist length
    pub playlist_len: usize,
}

/// Correction decided by a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Align the session's playing flag with the device
    SyncPlaying(bool),

    /// Current quote finished; start the next one
    AdvanceToNext,

    /// Last quote finished; stop without wrapping
    SettleStopped,
}

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// State for the next poll
    pub state: MonitorState,

    /// Correction to apply, if any
    pub action: Option<ReconcileAction>,
}

/// Decide what one poll should do
pub fn reconcile(prev: MonitorState, input: TickInput) -> Reconciliation {
    let mut transitioning = prev.transitioning;

    let action = if transitioning {
        if input.device_playing {
            // Next quote is audible
            transitioning = false;
            (!input.session_playing && input.has_current)
                .then_some(ReconcileAction::SyncPlaying(true))
        } else {
            if !input.session_playing && !input.operation_pending {
                // Advance ended without audio (failed or no narration)
                transitioning = false;
            }
            None
        }
    } else if prev.was_playing
        && !input.device_playing
        && input.session_playing
        && input.has_current
        && !input.operation_pending
    {
        if input.index + 1 < input.playlist_len {
            transitioning = true;
            Some(ReconcileAction::AdvanceToNext)
        } else {
            Some(ReconcileAction::SettleStopped)
        }
    } else if !input.operation_pending
        && input.device_playing != input.session_playing
        && (input.has_current || !input.device_playing)
    {
        Some(ReconcileAction::SyncPlaying(input.device_playing))
    } else {
        None
    };

    Reconciliation {
        state: MonitorState {
            was_playing: input.device_playing,
            transitioning,
        },
        action,
    }
}
