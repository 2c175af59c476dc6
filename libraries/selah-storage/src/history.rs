//! Viewing history
//!
//! Maintains a bounded, deduplicated list of recently viewed quotes

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of remembered quotes
pub const DEFAULT_HISTORY_SIZE: usize = 20;

/// Recently viewed quote ids with bounded size
///
/// Most recent entry is at the front. Re-visiting a quote moves it to the
/// front instead of duplicating it; when full, the oldest entry is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct History {
    /// History buffer (most recent = front)
    ids: VecDeque<String>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a visit to `id`
    ///
    /// If history is full, oldest entry is discarded
    pub fn push(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|h| h == id) {
            self.ids.remove(pos);
        }
        self.ids.push_front(id.to_string());
        self.ids.truncate(self.max_size);
    }

    /// Get most recent entry
    pub fn latest(&self) -> Option<&str> {
        self.ids.front().map(String::as_str)
    }

    /// Get all entries (most recent first)
    pub fn get_all(&self) -> Vec<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum history size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.ids.truncate(max_size);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

/// Stored lists are kept whole; the owner applies its own cap with
/// [`History::set_max_size`]
impl From<Vec<String>> for History {
    fn from(ids: Vec<String>) -> Self {
        let mut deduped: VecDeque<String> = VecDeque::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push_back(id);
            }
        }
        Self {
            max_size: deduped.len().max(DEFAULT_HISTORY_SIZE),
            ids: deduped,
        }
    }
}

impl From<History> for Vec<String> {
    fn from(history: History) -> Self {
        history.ids.into_iter().collect()
    }
}
