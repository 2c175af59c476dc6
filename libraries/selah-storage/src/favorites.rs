//! Favorite quotes
//!
//! Membership is what matters; the ids are kept in insertion order so the
//! serialized document is stable.

use serde::{Deserialize, Serialize};

/// Set of favorited quote ids, persisted as an ordered list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    /// Create an empty favorites set
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`
    ///
    /// Returns `true` if the quote is a favorite afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|f| f == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Check membership
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// All favorite ids, oldest first
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if there are no favorites
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
