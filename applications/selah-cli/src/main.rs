//! Selah CLI
//!
//! Plays devotional quotes on a simulated device and manages favorites,
//! history, streaks, settings and reminders.

use anyhow::Context;
use clap::{Parser, Subcommand};
use selah_cli::{App, SelahConfig};
use selah_core::ContentCatalog;
use selah_playback::{PlayOutcome, PlaybackEvent, SystemClock};
use selah_reminders::ScheduleOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "selah")]
#[command(about = "Devotional quotes with narration", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./selah.toml when present)
    #[arg(short, long, global = true, env = "SELAH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quote
    Play {
        /// Quote id
        id: String,

        /// Continue through the rest of the quote's category
        #[arg(long)]
        category: bool,
    },

    /// Play every quote in a category
    Category {
        /// Category name
        name: String,
    },

    /// Toggle a quote as favorite
    Favorite {
        /// Quote id
        id: String,
    },

    /// List favorite quotes
    Favorites,

    /// List recently viewed quotes
    History,

    /// Show today's progress and the current streak
    Streak,

    /// Show settings
    Settings,

    /// Toggle background music
    ToggleMusic,

    /// Set narration speed (0.5 - 2.0)
    Speed {
        /// Speed multiplier
        value: f32,
    },

    /// Schedule daily reminders from the settings
    Reminders,

    /// Find quotes by text, explanation, category or reference
    Search {
        /// Case-insensitive search text
        query: String,
    },

    /// Report image and narration coverage of the catalog
    Assets {
        /// Also list quotes that have both an image and narration
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "selah_cli=info,selah_playback=info,selah_reminders=info,selah_storage=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = SelahConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let app = App::open(config, Arc::new(SystemClock))
        .await
        .context("opening Selah data")?;

    match cli.command {
        Commands::Play { id, category } => {
            let outcome = app.play(&id, category).await?;
            settle(&app, outcome).await?;
        }
        Commands::Category { name } => {
            let outcome = app.play_category(&name).await?;
            settle(&app, outcome).await?;
        }
        Commands::Favorite { id } => {
            if app.toggle_favorite(&id).await? {
                println!("Added {id} to favorites");
            } else {
                println!("Removed {id} from favorites");
            }
        }
        Commands::Favorites => {
            let favorites = app.favorite_quotes();
            if favorites.is_empty() {
                println!("No favorites yet");
            }
            for quote in favorites {
                println!("[{}] {} ({})", quote.id, quote.text, quote.reference);
            }
        }
        Commands::History => {
            for quote in app.history_quotes() {
                println!("[{}] {}", quote.id, quote.text);
            }
        }
        Commands::Streak => {
            let controller = app.controller();
            let streak = controller.streak().await;
            println!(
                "Today: {} of {} quotes",
                streak.today_progress.quotes_listened,
                controller.config().daily_goal
            );
            println!("Remaining today: {}", controller.remaining_today());
            println!(
                "Streak: {} (longest {}, {} days total)",
                streak.current_streak, streak.longest_streak, streak.total_days_completed
            );
            println!("{}", controller.streak_tier().message());
        }
        Commands::Settings => {
            let settings = app.settings();
            println!("Dark mode:        {}", settings.is_dark_mode);
            println!("Playback speed:   {}", settings.playback_speed);
            println!("Background music: {}", settings.enable_background_music);
            println!("Notifications:    {}", settings.daily_notifications);
            for reminder in &settings.reminders {
                println!(
                    "  {:02}:{:02} {} {}",
                    reminder.hour,
                    reminder.minute,
                    reminder.label,
                    if reminder.enabled { "" } else { "(off)" }
                );
            }
        }
        Commands::ToggleMusic => {
            let enabled = app.toggle_background_music().await?;
            println!(
                "Background music {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        Commands::Speed { value } => {
            app.set_playback_speed(value).await?;
            println!("Playback speed set to {value}");
        }
        Commands::Reminders => match app.schedule_reminders().await? {
            ScheduleOutcome::Scheduled(count) => {
                println!("Scheduled {count} reminders");
                for request in app.scheduled_reminders() {
                    println!(
                        "  {:02}:{:02} {}: {}",
                        request.trigger.hour, request.trigger.minute, request.title, request.body
                    );
                }
            }
            ScheduleOutcome::PermissionDenied => println!("Notification permission denied"),
            ScheduleOutcome::Unsupported(reason) => println!("Reminders unavailable: {reason}"),
        },
        Commands::Search { query } => {
            let results = app.search(&query);
            println!("{} quotes match \"{query}\"", results.len());
            for quote in results {
                println!("[{}] {} ({})", quote.id, quote.text, quote.reference);
            }
        }
        Commands::Assets { list } => {
            let stats = app.asset_stats();
            println!("Quotes:    {}", stats.total);
            println!("Images:    {} ({}%)", stats.with_image, stats.image_percentage());
            println!("Narration: {} ({}%)", stats.with_audio, stats.audio_percentage());
            println!("Both:      {} ({}%)", stats.with_both, stats.both_percentage());
            if list {
                for quote in app.fully_covered_quotes() {
                    println!("  [{}] {}", quote.id, quote.text);
                }
            }
        }
    }

    Ok(())
}

async fn settle(app: &App, outcome: PlayOutcome) -> anyhow::Result<()> {
    match outcome {
        PlayOutcome::Playing => {}
        PlayOutcome::NoAudio => println!("No narration available for this quote"),
        PlayOutcome::Failed(message) => println!("Playback failed: {message}"),
        PlayOutcome::Superseded | PlayOutcome::Skipped => return Ok(()),
    }

    app.run_until_settled(|event| match event {
        PlaybackEvent::QuoteChanged { quote_id, index, .. } => {
            if let Some(quote) = app.catalog().quote_by_id(quote_id) {
                println!("[{}] {}", index + 1, quote.text);
                if !quote.reference.is_empty() {
                    println!("    {}", quote.reference);
                }
            }
        }
        PlaybackEvent::AudioUnavailable { quote_id } => {
            println!("    (no narration for {quote_id})");
        }
        PlaybackEvent::PlaybackFailed { message, .. } => println!("    playback failed: {message}"),
        PlaybackEvent::PlaylistEnded => println!("Finished"),
        PlaybackEvent::DailyGoalCompleted { streak, message, .. } => {
            println!("Daily goal reached! Streak: {streak}. {message}");
        }
        _ => {}
    })
    .await?;
    Ok(())
}
