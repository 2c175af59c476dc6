//! Asset coverage of a catalog

use crate::assets::AssetResolver;
use crate::types::Quote;
use serde::Serialize;

/// How many quotes have their own image and narration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssetStats {
    /// Quotes examined
    pub total: usize,
    /// Quotes with their own image
    pub with_image: usize,
    /// Quotes with narration
    pub with_audio: usize,
    /// Quotes with both
    pub with_both: usize,
}

impl AssetStats {
    /// Count coverage of `quotes` under `assets`
    pub fn collect(quotes: &[Quote], assets: &dyn AssetResolver) -> Self {
        quotes.iter().fold(
            Self {
                total: quotes.len(),
                ..Self::default()
            },
            |mut stats, quote| {
                let image = assets.has_image(&quote.id);
                let audio = assets.resolve_audio(&quote.id).is_some();
                stats.with_image += usize::from(image);
                stats.with_audio += usize::from(audio);
                stats.with_both += usize::from(image && audio);
                stats
            },
        )
    }

    /// Rounded percentage of quotes with an image
    pub fn image_percentage(&self) -> u32 {
        percentage(self.with_image, self.total)
    }

    /// Rounded percentage of quotes with narration
    pub fn audio_percentage(&self) -> u32 {
        percentage(self.with_audio, self.total)
    }

    /// Rounded percentage of quotes with both
    pub fn both_percentage(&self) -> u32 {
        percentage(self.with_both, self.total)
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as u32
}

/// Quotes that have both their own image and narration
pub fn quotes_with_assets(quotes: &[Quote], assets: &dyn AssetResolver) -> Vec<Quote> {
    quotes
        .iter()
        .filter(|q| assets.has_image(&q.id) && assets.resolve_audio(&q.id).is_some())
        .cloned()
        .collect()
}
