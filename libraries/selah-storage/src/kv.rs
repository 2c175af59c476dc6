//! Key-value persistence
//!
//! Documents are stored as JSON blobs under named slots. Every write replaces
//! the whole document; there is no partial update.

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Asynchronous slot store for serialized documents
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, `None` if it was never written
    async fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of a slot
    async fn set(&self, slot: &str, value: String) -> Result<()>;

    /// Delete a slot (no-op if absent)
    async fn remove(&self, slot: &str) -> Result<()>;
}

/// Volatile store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn set(&self, slot: &str, value: String) -> Result<()> {
        self.slots.write().await.insert(slot.to_string(), value);
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        self.slots.write().await.remove(slot);
        Ok(())
    }
}

/// File-backed store keeping one `<slot>.json` file per slot
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Opened slot store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidSlot(slot.to_string()));
        }
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, slot: &str, value: String) -> Result<()> {
        let path = self.slot_path(slot)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("player-storage").await.unwrap(), None);

        store.set("player-storage", "{}".to_string()).await.unwrap();
        assert_eq!(
            store.get("player-storage").await.unwrap().as_deref(),
            Some("{}")
        );

        store.remove("player-storage").await.unwrap();
        assert_eq!(store.get("player-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        for slot in ["", "../escape", "a/b", "dot.dot"] {
            assert!(matches!(
                store.set(slot, "{}".to_string()).await,
                Err(StorageError::InvalidSlot(_))
            ));
        }
    }
}
