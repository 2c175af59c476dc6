//! Catalog and asset resolver tests against real files

use selah_core::{
    quotes_with_assets, AssetHandle, AssetResolver, AssetStats, ContentCatalog, DirectoryAssets,
    StaticCatalog,
};
use std::fs;

const CATALOG_JSON: &str = r#"{
    "quotes": [
        {
            "id": "1",
            "text": "Blessed are the poor in spirit, for theirs is the kingdom of heaven.",
            "attribution": "Jesus of Nazareth",
            "category": "Kingdom of God",
            "explanation": "Those who recognize their need for God will receive His kingdom.",
            "imageUrl": "https://example.com/1.jpg",
            "reference": "Matthew 5:3"
        },
        {
            "id": "2",
            "text": "Ask, and it will be given to you.",
            "category": "Prayer & Faith",
            "reference": "Matthew 7:7"
        }
    ],
    "categories": [
        { "id": "1", "name": "Kingdom of God", "icon": "crown", "description": "God's reign" },
        { "id": "2", "name": "Prayer & Faith", "icon": "hands", "description": "Connecting with God" }
    ]
}"#;

#[test]
fn load_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, CATALOG_JSON).unwrap();

    let catalog = StaticCatalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.quote_by_id("2").unwrap().reference, "Matthew 7:7");
    assert_eq!(catalog.categories()[0].quote_count, Some(1));
    assert!(catalog.random_quote().is_some());
}

#[test]
fn load_missing_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(StaticCatalog::load(dir.path().join("missing.json")).is_err());
}

#[test]
fn directory_assets_resolve_existing_files_only() {
    let dir = tempfile::tempdir().unwrap();
    let audio_dir = dir.path().join("audio");
    let image_dir = dir.path().join("images");
    fs::create_dir_all(&audio_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    fs::write(audio_dir.join("command_1.mp3"), b"ID3").unwrap();
    fs::write(image_dir.join("command_1.jpg"), b"jpg").unwrap();
    let default_image = image_dir.join("default.jpg");
    fs::write(&default_image, b"jpg").unwrap();

    let assets = DirectoryAssets::new(&audio_dir, &image_dir, &default_image);

    assert_eq!(
        assets.resolve_audio("1"),
        Some(AssetHandle::File(audio_dir.join("command_1.mp3")))
    );
    assert_eq!(assets.resolve_audio("2"), None);

    assert_eq!(
        assets.resolve_image("1"),
        AssetHandle::File(image_dir.join("command_1.jpg"))
    );
    assert_eq!(assets.resolve_image("2"), AssetHandle::File(default_image));

    assert!(assets.has_image("1"));
    assert!(!assets.has_image("2"));

    let catalog = StaticCatalog::from_json_str(CATALOG_JSON).unwrap();
    let stats = AssetStats::collect(catalog.quotes(), &assets);
    assert_eq!((stats.total, stats.with_image, stats.with_audio, stats.with_both), (2, 1, 1, 1));
    assert_eq!(stats.both_percentage(), 50);
    assert_eq!(quotes_with_assets(catalog.quotes(), &assets)[0].id, "1");
}

#[test]
fn search_matches_loaded_catalog() {
    let catalog = StaticCatalog::from_json_str(CATALOG_JSON).unwrap();

    let ids: Vec<_> = catalog.search("kingdom").into_iter().map(|q| q.id).collect();
    assert_eq!(ids, vec!["1"]);
    assert_eq!(catalog.search("matthew").len(), 2);
}

#[test]
fn directory_music_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let music = dir.path().join("peaceful_ambient.mp3");

    let assets = DirectoryAssets::new(dir.path(), dir.path(), dir.path().join("d.jpg"))
        .with_music(&music);
    assert!(assets.music_asset().is_none());

    fs::write(&music, b"ID3").unwrap();
    assert_eq!(assets.music_asset(), Some(AssetHandle::File(music)));
}
