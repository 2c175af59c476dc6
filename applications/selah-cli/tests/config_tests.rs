use selah_cli::{CliError, SelahConfig};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

#[test]
fn defaults_without_file() {
    let config = SelahConfig::load_with_env(None, env(&[])).unwrap();

    assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    assert_eq!(config.playback.poll_interval_ms, 350);
    assert_eq!(config.playback.load_timeout_ms, 15_000);
    assert_eq!(config.simulation.clip_length_ms, 3_000);
    assert!(config.assets.music.is_none());
}

#[test]
fn file_values_are_read() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[storage]
data_dir = "/var/lib/selah"

[assets]
music = "https://media.selah.app/audio/background.mp3"

[playback]
daily_goal = 5
music_volume = 0.5
"#
    )
    .unwrap();

    let config = SelahConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

    assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/selah"));
    assert_eq!(config.playback.daily_goal, 5);
    assert_eq!(config.playback.music_volume, 0.5);
    // Unset keys keep their defaults
    assert_eq!(config.playback.history_size, 20);
    assert_eq!(
        config.assets.music.as_deref(),
        Some("https://media.selah.app/audio/background.mp3")
    );
}

#[test]
fn environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[playback]\npoll_interval_ms = 500").unwrap();

    let config = SelahConfig::load_with_env(
        Some(file.path()),
        env(&[
            ("SELAH_PLAYBACK__POLL_INTERVAL_MS", "100"),
            ("SELAH_STORAGE__DATA_DIR", "/tmp/selah"),
        ]),
    )
    .unwrap();

    assert_eq!(config.playback.poll_interval_ms, 100);
    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/selah"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let result = SelahConfig::load_with_env(Some(&PathBuf::from("/nonexistent/selah.toml")), env(&[]));
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn out_of_range_music_volume_is_rejected() {
    let result =
        SelahConfig::load_with_env(None, env(&[("SELAH_PLAYBACK__MUSIC_VOLUME", "1.5")]));
    assert!(matches!(result, Err(CliError::Config(_))));
}
