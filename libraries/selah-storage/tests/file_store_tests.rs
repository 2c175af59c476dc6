//! JSON file store integration tests

use selah_storage::{
    JsonFileStore, KeyValueStore, PlayerDocument, Slot, StorageError, PLAYER_SLOT,
};
use std::sync::Arc;

#[tokio::test]
async fn test_missing_slot_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();

    assert_eq!(store.get(PLAYER_SLOT).await.unwrap(), None);
}

#[tokio::test]
async fn test_set_writes_slot_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();

    store.set(PLAYER_SLOT, r#"{"a":1}"#.to_string()).await.unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("player-storage.json")).unwrap();
    assert_eq!(on_disk, r#"{"a":1}"#);
    assert!(!dir.path().join("player-storage.json.tmp").exists());
}

#[tokio::test]
async fn test_overwrite_replaces_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();

    store.set("settings-storage", "first-and-longer".to_string()).await.unwrap();
    store.set("settings-storage", "second".to_string()).await.unwrap();

    assert_eq!(
        store.get("settings-storage").await.unwrap().as_deref(),
        Some("second")
    );
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();

    store.set(PLAYER_SLOT, "{}".to_string()).await.unwrap();
    store.remove(PLAYER_SLOT).await.unwrap();
    store.remove(PLAYER_SLOT).await.unwrap();

    assert_eq!(store.get(PLAYER_SLOT).await.unwrap(), None);
}

#[tokio::test]
async fn test_open_creates_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let store = JsonFileStore::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    assert_eq!(store.dir(), nested.as_path());
}

#[tokio::test]
async fn test_player_document_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut document = PlayerDocument::default();
    document.favorites.toggle("12");
    document.history.push("3");
    document.history.push("12");

    {
        let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
        let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
        slot.save(&document).await.unwrap();
    }

    let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
    let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
    let loaded = slot.load().await.unwrap();

    assert_eq!(loaded, document);
    assert_eq!(loaded.history.get_all(), vec!["12", "3"]);
}

#[tokio::test]
async fn test_document_with_unknown_fields_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
    store
        .set(
            PLAYER_SLOT,
            r#"{"favorites":["1"],"legacyField":true,"history":["2","1"]}"#.to_string(),
        )
        .await
        .unwrap();

    let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
    let loaded = slot.load().await.unwrap();
    assert!(loaded.favorites.contains("1"));
    assert_eq!(loaded.history.latest(), Some("2"));
}

#[tokio::test]
async fn test_truncated_document_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
    store.set(PLAYER_SLOT, r#"{"favorites":["1""#.to_string()).await.unwrap();

    let slot: Slot<PlayerDocument> = Slot::new(store, PLAYER_SLOT);
    assert!(matches!(
        slot.load().await,
        Err(StorageError::CorruptDocument { .. })
    ));
}
