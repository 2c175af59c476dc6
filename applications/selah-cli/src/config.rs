/// CLI configuration
use crate::error::{CliError, Result};
use selah_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "selah.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SelahConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub assets: AssetSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetSettings {
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    #[serde(default = "default_image")]
    pub default_image: PathBuf,

    /// Ambient music: a file path or an http(s) URL
    #[serde(default)]
    pub music: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length of every simulated narration clip
    #[serde(default = "default_clip_length_ms")]
    pub clip_length_ms: u64,
}

impl SimulationSettings {
    pub fn clip_length(&self) -> Duration {
        Duration::from_millis(self.clip_length_ms)
    }
}

impl SelahConfig {
    /// Load from `path` (or `selah.toml` if present) and `SELAH_` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`SelahConfig::load`], reading variables from `env` instead of the process
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. SELAH_STORAGE__DATA_DIR
        settings = settings.add_source(
            config::Environment::with_prefix("SELAH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: SelahConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.poll_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.playback.music_volume) {
            return Err(CliError::Config(format!(
                "playback.music_volume {} is outside 0.0..=1.0",
                self.playback.music_volume
            )));
        }
        if self.simulation.clip_length_ms == 0 {
            return Err(CliError::Config(
                "simulation.clip_length_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// Default values
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./fixtures/catalog.json")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./assets/audio")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("./assets/images")
}

fn default_image() -> PathBuf {
    PathBuf::from("./assets/images/default.jpg")
}

fn default_clip_length_ms() -> u64 {
    3_000
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            image_dir: default_image_dir(),
            default_image: default_image(),
            music: None,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            clip_length_ms: default_clip_length_ms(),
        }
    }
}
