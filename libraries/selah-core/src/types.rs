//! Core content types
//!
//! Quotes and categories are immutable once loaded. The catalog owns them and
//! the playback core only ever reads them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable, externally assigned quote identifier
pub type QuoteId = String;

/// A single teaching with its display text and media references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Stable identifier
    pub id: QuoteId,

    /// Display text
    pub text: String,

    /// Speaker attribution
    #[serde(default)]
    pub attribution: String,

    /// Category name this quote belongs to
    pub category: String,

    /// Short explanation shown under the text
    #[serde(default)]
    pub explanation: String,

    /// Scripture reference (e.g. "Matthew 5:3")
    #[serde(default)]
    pub reference: String,

    /// Remote image reference, used when no bundled image exists
    #[serde(default)]
    pub image_url: String,

    /// Remote narration reference (may be absent)
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl Quote {
    /// Create a quote with only the required fields set
    pub fn new(id: impl Into<String>, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            attribution: String::new(),
            category: category.into(),
            explanation: String::new(),
            reference: String::new(),
            image_url: String::new(),
            audio_url: None,
        }
    }
}

/// A browsable grouping of quotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable identifier
    pub id: String,

    /// Display name, matched against `Quote::category`
    pub name: String,

    /// Icon glyph
    #[serde(default)]
    pub icon: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Number of quotes in this category (derived on catalog load)
    #[serde(default)]
    pub quote_count: Option<usize>,
}

/// Reference to a playable or displayable asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum AssetHandle {
    /// Bundled or downloaded local file
    File(PathBuf),

    /// Remote resource
    Url(String),
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetHandle::File(path) => write!(f, "{}", path.display()),
            AssetHandle::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_deserializes_from_camel_case() {
        let json = r#"{
            "id": "1",
            "text": "Blessed are the poor in spirit, for theirs is the kingdom of heaven.",
            "attribution": "Jesus of Nazareth",
            "category": "Kingdom of God",
            "explanation": "Those who recognize their need for God will receive His kingdom.",
            "imageUrl": "https://example.com/1.jpg",
            "audioUrl": "https://example.com/audio/1.mp3",
            "reference": "Matthew 5:3"
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, "1");
        assert_eq!(quote.reference, "Matthew 5:3");
        assert_eq!(quote.audio_url.as_deref(), Some("https://example.com/audio/1.mp3"));
    }

    #[test]
    fn quote_without_audio() {
        let json = r#"{"id": "9", "text": "Follow me.", "category": "Discipleship"}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert!(quote.audio_url.is_none());
        assert!(quote.explanation.is_empty());
    }

    #[test]
    fn asset_handle_display() {
        let file = AssetHandle::File(PathBuf::from("/assets/audio/command_1.mp3"));
        assert_eq!(file.to_string(), "/assets/audio/command_1.mp3");

        let url = AssetHandle::Url("https://example.com/a.mp3".to_string());
        assert_eq!(url.to_string(), "https://example.com/a.mp3");
    }
}
