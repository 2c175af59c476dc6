//! Asset resolution
//!
//! Maps a quote id to its narration and image assets. Missing narration is a
//! normal condition (`None`), missing images fall back to a default.

use crate::types::AssetHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Resolves quote ids to playable and displayable assets
pub trait AssetResolver: Send + Sync {
    /// Narration audio for a quote, `None` when no recording exists
    fn resolve_audio(&self, id: &str) -> Option<AssetHandle>;

    /// Image for a quote, falling back to the default image
    fn resolve_image(&self, id: &str) -> AssetHandle;

    /// Whether a quote has its own image rather than the default
    fn has_image(&self, id: &str) -> bool;

    /// The looping ambient music bed, if one is bundled
    fn music_asset(&self) -> Option<AssetHandle> {
        None
    }
}

/// Resolver backed by asset directories
///
/// Narration files are named `command_<id>.mp3` and images `command_<id>.jpg`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    audio_dir: PathBuf,
    image_dir: PathBuf,
    default_image: PathBuf,
    music: Option<PathBuf>,
}

impl DirectoryAssets {
    /// Create a resolver over the given directories
    pub fn new(
        audio_dir: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
        default_image: impl Into<PathBuf>,
    ) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            image_dir: image_dir.into(),
            default_image: default_image.into(),
            music: None,
        }
    }

    /// Set the ambient music file
    pub fn with_music(mut self, music: impl Into<PathBuf>) -> Self {
        self.music = Some(music.into());
        self
    }

    fn audio_path(&self, id: &str) -> PathBuf {
        self.audio_dir.join(format!("command_{id}.mp3"))
    }

    fn image_path(&self, id: &str) -> PathBuf {
        self.image_dir.join(format!("command_{id}.jpg"))
    }
}

impl AssetResolver for DirectoryAssets {
    fn resolve_audio(&self, id: &str) -> Option<AssetHandle> {
        let path = self.audio_path(id);
        if path.is_file() {
            Some(AssetHandle::File(path))
        } else {
            debug!("No narration for quote {}", id);
            None
        }
    }

    fn resolve_image(&self, id: &str) -> AssetHandle {
        let path = self.image_path(id);
        if path.is_file() {
            AssetHandle::File(path)
        } else {
            AssetHandle::File(self.default_image.clone())
        }
    }

    fn has_image(&self, id: &str) -> bool {
        self.image_path(id).is_file()
    }

    fn music_asset(&self) -> Option<AssetHandle> {
        self.music
            .as_ref()
            .filter(|path| path.is_file())
            .cloned()
            .map(AssetHandle::File)
    }
}

/// Resolver backed by explicit id-to-asset maps
#[derive(Debug, Clone)]
pub struct MappedAssets {
    audio: HashMap<String, AssetHandle>,
    images: HashMap<String, AssetHandle>,
    default_image: AssetHandle,
    music: Option<AssetHandle>,
}

impl MappedAssets {
    /// Create an empty map with the given fallback image
    pub fn new(default_image: AssetHandle) -> Self {
        Self {
            audio: HashMap::new(),
            images: HashMap::new(),
            default_image,
            music: None,
        }
    }

    /// Register narration for a quote
    pub fn with_audio(mut self, id: impl Into<String>, handle: AssetHandle) -> Self {
        self.audio.insert(id.into(), handle);
        self
    }

    /// Register an image for a quote
    pub fn with_image(mut self, id: impl Into<String>, handle: AssetHandle) -> Self {
        self.images.insert(id.into(), handle);
        self
    }

    /// Register the ambient music bed
    pub fn with_music(mut self, handle: AssetHandle) -> Self {
        self.music = Some(handle);
        self
    }
}

impl AssetResolver for MappedAssets {
    fn resolve_audio(&self, id: &str) -> Option<AssetHandle> {
        self.audio.get(id).cloned()
    }

    fn resolve_image(&self, id: &str) -> AssetHandle {
        self.images
            .get(id)
            .cloned()
            .unwrap_or_else(|| self.default_image.clone())
    }

    fn has_image(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    fn music_asset(&self) -> Option<AssetHandle> {
        self.music.clone()
    }
}
