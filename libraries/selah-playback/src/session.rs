//! Playlist and narration session state
//!
//! All changes to [`SessionState`] go through [`SessionState::apply`], which
//! keeps the flags consistent: a session is never both loading and playing,
//! and never playing without a quote or without narration.

use crate::types::SessionStatus;
use selah_core::Quote;
use serde::{Deserialize, Serialize};

/// Ordered quotes with a current position
///
/// Manual navigation wraps around in both directions; automatic advance
/// after a finished quote does not (see [`Playlist::has_next`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    quotes: Vec<Quote>,
    index: usize,
}

impl Playlist {
    /// Playlist positioned on `current`
    ///
    /// An empty `quotes` list becomes a one-quote playlist. If `current` is
    /// not in `quotes` the position is 0.
    pub fn new(quotes: Vec<Quote>, current: &Quote) -> Self {
        if quotes.is_empty() {
            return Self::single(current.clone());
        }
        let index = quotes.iter().position(|q| q.id == current.id).unwrap_or(0);
        Self { quotes, index }
    }

    /// One-quote playlist
    pub fn single(quote: Quote) -> Self {
        Self {
            quotes: vec![quote],
            index: 0,
        }
    }

    /// Rebuild from persisted parts, clamping the index
    pub fn from_parts(quotes: Vec<Quote>, index: usize) -> Self {
        let index = if index < quotes.len() { index } else { 0 };
        Self { quotes, index }
    }

    /// Number of quotes
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Current position
    pub fn index(&self) -> usize {
        self.index
    }

    /// All quotes in order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quote at the current position
    pub fn current(&self) -> Option<&Quote> {
        self.quotes.get(self.index)
    }

    /// Position after the current one, wrapping to the start
    pub fn next_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| (self.index + 1) % self.len())
    }

    /// Position before the current one, wrapping to the end
    pub fn previous_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| (self.index + self.len() - 1) % self.len())
    }

    /// Whether a quote follows the current one without wrapping
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len()
    }

    /// Move to `index`, returning the quote there
    pub fn select(&mut self, index: usize) -> Option<&Quote> {
        if index >= self.len() {
            return None;
        }
        self.index = index;
        self.current()
    }

    /// Move forward with wraparound
    pub fn advance(&mut self) -> Option<&Quote> {
        let next = self.next_index()?;
        self.select(next)
    }

    /// Move backward with wraparound
    pub fn retreat(&mut self) -> Option<&Quote> {
        let previous = self.previous_index()?;
        self.select(previous)
    }

    /// Consume, returning quotes and position
    pub fn into_parts(self) -> (Vec<Quote>, usize) {
        (self.quotes, self.index)
    }
}

/// State change requested of a [`SessionState`]
#[derive(Debug, Clone)]
pub enum Transition {
    /// A quote became current; narration will load if `has_audio`
    Begin {
        /// Playlist positioned on the new quote
        playlist: Playlist,
        /// Narration exists for the quote
        has_audio: bool,
    },

    /// Narration started
    Started,

    /// Loading or starting failed
    Failed,

    /// Align the playing flag
    SetPlaying(bool),

    /// Narration reached the end with nothing to advance to
    Finished,

    /// Session cleared
    Cleared,
}

/// Narration session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    playlist: Playlist,
    has_current: bool,
    is_playing: bool,
    is_loading: bool,
    audio_available: bool,
    at_end: bool,
    generation: u64,
}

impl SessionState {
    /// Restore a persisted session; it is never playing
    pub fn restore(current: Option<Quote>, quotes: Vec<Quote>, index: usize) -> Self {
        let playlist = match current {
            Some(quote) if quotes.get(index).map(|q| &q.id) == Some(&quote.id) => {
                Playlist::from_parts(quotes, index)
            }
            Some(quote) => Playlist::new(quotes, &quote),
            None => Playlist::default(),
        };
        Self {
            has_current: !playlist.is_empty(),
            playlist,
            ..Self::default()
        }
    }

    /// Apply a transition, returning whether anything visible changed
    pub fn apply(&mut self, transition: Transition) -> bool {
        let before = (self.status(), self.playlist.index(), self.has_current);

        match transition {
            Transition::Begin {
                playlist,
                has_audio,
            } => {
                self.has_current = playlist.current().is_some();
                self.playlist = playlist;
                self.audio_available = has_audio && self.has_current;
                self.is_loading = self.audio_available;
                self.is_playing = false;
                self.at_end = false;
                self.generation += 1;
            }
            Transition::Started => {
                self.is_loading = false;
                self.is_playing = self.has_current && self.audio_available;
            }
            Transition::Failed => {
                self.is_loading = false;
                self.is_playing = false;
            }
            Transition::SetPlaying(playing) => {
                self.is_playing = playing && self.has_current && self.audio_available;
                if self.is_playing {
                    self.is_loading = false;
                    self.at_end = false;
                }
            }
            Transition::Finished => {
                self.is_playing = false;
                self.at_end = true;
            }
            Transition::Cleared => {
                self.playlist = Playlist::default();
                self.has_current = false;
                self.is_playing = false;
                self.is_loading = false;
                self.audio_available = false;
                self.at_end = false;
                self.generation += 1;
            }
        }

        debug_assert!(!(self.is_playing && self.is_loading));
        debug_assert!(!self.is_playing || self.has_current);

        before != (self.status(), self.playlist.index(), self.has_current)
    }

    /// Quote shown in the player
    pub fn current_quote(&self) -> Option<&Quote> {
        if self.has_current {
            self.playlist.current()
        } else {
            None
        }
    }

    /// Active playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Narration audible (as far as the session knows)
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Narration loading
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Current quote has narration
    pub fn audio_available(&self) -> bool {
        self.audio_available
    }

    /// Narration played to its end
    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Incremented whenever the current quote is replaced or cleared
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Status for the UI
    pub fn status(&self) -> SessionStatus {
        if !self.has_current {
            SessionStatus::Idle
        } else if self.is_loading {
            SessionStatus::Loading
        } else if self.is_playing {
            SessionStatus::Playing
        } else {
            SessionStatus::Paused
        }
    }

    /// Read-only copy for callers
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_quote: self.current_quote().cloned(),
            status: self.status(),
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            audio_available: self.audio_available,
            index: self.playlist.index(),
            playlist_len: self.playlist.len(),
        }
    }
}

/// Session as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Quote shown in the player
    pub current_quote: Option<Quote>,

    /// Derived status
    pub status: SessionStatus,

    /// Narration audible
    pub is_playing: bool,

    /// Narration loading
    pub is_loading: bool,

    /// Current quote has narration
    pub audio_available: bool,

    /// Playlist position
    pub index: usize,

    /// Playlist length
    pub playlist_len: usize,
}

impl SessionSnapshot {
    /// Narration is playing within a non-empty playlist
    pub fn is_active(&self) -> bool {
        self.is_playing && self.playlist_len > 0
    }
}
