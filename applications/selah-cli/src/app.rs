//! Application wiring
//!
//! Builds the catalog, stores, session controller, background music and
//! reminder scheduler from a [`SelahConfig`], and drives a session until
//! it settles.

use crate::config::SelahConfig;
use crate::error::{CliError, Result};
use selah_core::{
    quotes_with_assets, AssetHandle, AssetResolver, AssetStats, Capability, ContentCatalog,
    DirectoryAssets, MappedAssets, Quote, SelahError, StaticCatalog,
};
use selah_playback::{
    BackgroundMusic, Clock, PlayOutcome, PlaybackEvent, PlaybackMonitor, SessionController,
    SessionStatus, SimulatedDevice,
};
use selah_reminders::{InMemoryPlatform, ReminderScheduler, ScheduleOutcome};
use selah_storage::{JsonFileStore, KeyValueStore, Settings, SettingsStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Longest a single settle wait may take before giving up
const SETTLE_LIMIT: Duration = Duration::from_secs(600);

/// Everything a command needs
pub struct App {
    config: SelahConfig,
    catalog: Arc<StaticCatalog>,
    assets: Arc<MappedAssets>,
    settings: SettingsStore,
    controller: Arc<SessionController>,
    music: Arc<BackgroundMusic>,
    reminders: ReminderScheduler,
    platform: Arc<InMemoryPlatform>,
}

impl App {
    /// Open the data directory and rehydrate all state
    pub async fn open(config: SelahConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let catalog = Arc::new(StaticCatalog::load(&config.catalog.path)?);
        info!(
            "Catalog loaded from {} ({} quotes)",
            config.catalog.path.display(),
            catalog.len()
        );

        let store: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(config.storage.data_dir.clone()).await?);
        let settings = SettingsStore::load(Arc::clone(&store)).await?;
        let current = settings.get();

        let assets = Arc::new(resolve_assets(&config, catalog.quotes()));
        let clip_length = config.simulation.clip_length();

        let narration = Arc::new(SimulatedDevice::with_clip_length(clip_length));
        let controller = Arc::new(
            SessionController::rehydrate(
                config.playback.clone(),
                narration,
                assets.clone(),
                clock,
                store,
            )
            .await?,
        );
        controller.set_playback_rate(current.playback_speed).await?;

        let music = BackgroundMusic::new(
            Arc::new(SimulatedDevice::new()),
            assets.music_asset(),
            current.enable_background_music,
            &config.playback,
        );

        let platform = Arc::new(InMemoryPlatform::granting());
        let reminders = ReminderScheduler::new(
            Capability::Supported,
            platform.clone(),
            catalog.clone(),
        );

        Ok(Self {
            config,
            catalog,
            assets,
            settings,
            controller,
            music,
            reminders,
            platform,
        })
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    /// Quotes matching `query` in text, explanation, category or reference
    pub fn search(&self, query: &str) -> Vec<Quote> {
        self.catalog.search(query)
    }

    /// Image and narration coverage of the catalog
    pub fn asset_stats(&self) -> AssetStats {
        AssetStats::collect(self.catalog.quotes(), self.assets.as_ref())
    }

    /// Quotes with both their own image and narration
    pub fn fully_covered_quotes(&self) -> Vec<Quote> {
        quotes_with_assets(self.catalog.quotes(), self.assets.as_ref())
    }

    pub fn controller(&self) -> &Arc<SessionController> {
        &self.controller
    }

    pub fn music(&self) -> &Arc<BackgroundMusic> {
        &self.music
    }

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    /// Play one quote, optionally with the rest of its category queued
    pub async fn play(&self, quote_id: &str, with_category: bool) -> Result<PlayOutcome> {
        let quote = self
            .catalog
            .quote_by_id(quote_id)
            .ok_or_else(|| SelahError::QuoteNotFound(quote_id.to_string()))?;

        let playlist = if with_category {
            self.catalog.quotes_by_category(&quote.category)
        } else {
            Vec::new()
        };

        Ok(self.controller.play_quote(quote, playlist).await)
    }

    /// Play a whole category from its first quote
    pub async fn play_category(&self, name: &str) -> Result<PlayOutcome> {
        let quotes = self.catalog.quotes_by_category(name);
        let first = quotes
            .first()
            .cloned()
            .ok_or_else(|| SelahError::CategoryNotFound(name.to_string()))?;

        Ok(self.controller.play_quote(first, quotes).await)
    }

    /// Flip the favorite flag of a quote
    pub async fn toggle_favorite(&self, quote_id: &str) -> Result<bool> {
        if self.catalog.quote_by_id(quote_id).is_none() {
            return Err(SelahError::QuoteNotFound(quote_id.to_string()).into());
        }
        Ok(self.controller.toggle_favorite(quote_id).await)
    }

    /// Favorite quotes that still exist in the catalog
    pub fn favorite_quotes(&self) -> Vec<Quote> {
        self.lookup(self.controller.favorites())
    }

    /// Recently viewed quotes, newest first
    pub fn history_quotes(&self) -> Vec<Quote> {
        self.lookup(self.controller.history())
    }

    fn lookup(&self, ids: Vec<String>) -> Vec<Quote> {
        ids.iter()
            .filter_map(|id| self.catalog.quote_by_id(id))
            .collect()
    }

    /// Flip the background music setting and apply it
    pub async fn toggle_background_music(&self) -> Result<bool> {
        let enabled = self.settings.toggle_background_music().await?;
        self.music.set_enabled(enabled).await;
        Ok(enabled)
    }

    /// Persist and apply a new narration speed
    pub async fn set_playback_speed(&self, speed: f32) -> Result<()> {
        self.settings.set_playback_speed(speed).await?;
        self.controller.set_playback_rate(speed).await?;
        Ok(())
    }

    /// Reschedule reminders from the current settings
    pub async fn schedule_reminders(&self) -> Result<ScheduleOutcome> {
        let outcome = self.reminders.apply_settings(&self.settings.get()).await?;
        debug!("{} reminders held by the platform", self.platform.scheduled().len());
        Ok(outcome)
    }

    /// Reminders as the platform holds them
    pub fn scheduled_reminders(&self) -> Vec<selah_reminders::ReminderRequest> {
        self.platform.scheduled()
    }

    /// Drive the session until narration stops, then let music wind down
    ///
    /// Events are handed to `on_event` as they are produced.
    pub async fn run_until_settled(&self, on_event: impl FnMut(&PlaybackEvent)) -> Result<()> {
        self.run_until_settled_within(SETTLE_LIMIT, on_event).await
    }

    /// Like [`App::run_until_settled`], giving up after `limit`
    pub async fn run_until_settled_within(
        &self,
        limit: Duration,
        mut on_event: impl FnMut(&PlaybackEvent),
    ) -> Result<()> {
        let poll = self.config.playback.poll_interval();
        let monitor = PlaybackMonitor::spawn(
            Arc::clone(&self.controller),
            Some(Arc::clone(&self.music)),
            poll,
        );

        let waited = tokio::time::timeout(limit, async {
            loop {
                tokio::time::sleep(poll).await;
                for event in self.controller.drain_events() {
                    on_event(&event);
                }
                if !matches!(
                    self.controller.status(),
                    SessionStatus::Playing | SessionStatus::Loading
                ) {
                    break;
                }
            }
        })
        .await;

        if waited.is_err() {
            monitor.stop();
            return Err(CliError::SettleTimeout(limit));
        }

        // One more observation pass so the music sees the falling edge
        tokio::time::sleep(poll * 2).await;
        if self.music.stop_pending() {
            tokio::time::sleep(self.config.playback.music_stop_grace() + poll).await;
        }
        monitor.stop();

        for event in self.controller.drain_events() {
            on_event(&event);
        }
        Ok(())
    }
}

/// Narration from the audio directory, falling back to each quote's URL
fn resolve_assets(config: &SelahConfig, quotes: &[Quote]) -> MappedAssets {
    let directory = DirectoryAssets::new(
        &config.assets.audio_dir,
        &config.assets.image_dir,
        &config.assets.default_image,
    );

    let mut assets = MappedAssets::new(AssetHandle::File(config.assets.default_image.clone()));
    for quote in quotes {
        let audio = directory
            .resolve_audio(&quote.id)
            .or_else(|| quote.audio_url.clone().map(AssetHandle::Url));
        if let Some(audio) = audio {
            assets = assets.with_audio(quote.id.clone(), audio);
        }
        if directory.has_image(&quote.id) {
            assets = assets.with_image(quote.id.clone(), directory.resolve_image(&quote.id));
        }
    }

    if let Some(music) = music_asset(config) {
        assets = assets.with_music(music);
    }
    assets
}

fn music_asset(config: &SelahConfig) -> Option<AssetHandle> {
    let music = config.assets.music.as_deref()?;
    if music.starts_with("http://") || music.starts_with("https://") {
        return Some(AssetHandle::Url(music.to_string()));
    }
    DirectoryAssets::new(
        &config.assets.audio_dir,
        &config.assets.image_dir,
        &config.assets.default_image,
    )
    .with_music(PathBuf::from(music))
    .music_asset()
}
