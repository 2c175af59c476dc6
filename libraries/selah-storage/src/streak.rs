//! Daily listening goal and streak tracking
//!
//! Progress is kept per local calendar day. A day counts as completed the
//! first time its play count reaches the daily goal, and that crossing is the
//! only point where the streak and the completed-day total move forward.
//!
//! Before any read or increment the stored progress is normalized to today
//! with [`EngagementTracker::reconcile_day`]. The streak survives a rollover
//! only if the day being rolled over was yesterday and was completed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Plays needed to complete a day
pub const DEFAULT_DAILY_GOAL: u32 = 3;

/// Number of past days kept in the rolling progress window
pub const DEFAULT_PROGRESS_WINDOW: usize = 30;

/// Progress for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    /// Calendar day
    pub date: NaiveDate,

    /// Quotes played on that day
    pub quotes_listened: u32,

    /// Whether the daily goal was reached
    pub completed: bool,
}

impl DailyProgress {
    /// Fresh progress for `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            quotes_listened: 0,
            completed: false,
        }
    }
}

/// Persisted streak state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakData {
    /// Consecutive completed days, including today once completed
    pub current_streak: u32,

    /// Best streak ever reached
    pub longest_streak: u32,

    /// Days on which the goal was reached
    pub total_days_completed: u32,

    /// Most recent completed day
    pub last_completed_date: Option<NaiveDate>,

    /// Progress for the current day
    pub today_progress: DailyProgress,

    /// Past days, oldest first, capped to the progress window
    pub daily_progress_history: Vec<DailyProgress>,

    /// Goal completion waiting to be acknowledged by the user
    pub celebration_pending: bool,
}

impl Default for StreakData {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_days_completed: 0,
            last_completed_date: None,
            today_progress: DailyProgress::new(NaiveDate::default()),
            daily_progress_history: Vec::new(),
            celebration_pending: false,
        }
    }
}

/// Emitted once per day when the daily goal is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    /// Streak after today's completion
    pub streak: u32,

    /// Completed days including today
    pub total_days: u32,
}

/// Encouragement tier for a streak length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTier {
    /// First completed day
    FirstDay,
    /// Up to a week
    Week,
    /// Up to a month
    Month,
    /// Beyond a month
    Faithful,
}

impl StreakTier {
    /// Tier for a streak length
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0 | 1 => StreakTier::FirstDay,
            2..=7 => StreakTier::Week,
            8..=30 => StreakTier::Month,
            _ => StreakTier::Faithful,
        }
    }

    /// Message shown with the celebration
    pub fn message(self) -> &'static str {
        match self {
            StreakTier::FirstDay => "Your sins are forgiven my child",
            StreakTier::Week => "The Lord is pleased with your faithfulness",
            StreakTier::Month => "You are walking in His light",
            StreakTier::Faithful => "You are a faithful servant of the Most High",
        }
    }
}

/// Derives daily progress and streaks from play events
#[derive(Debug, Clone)]
pub struct EngagementTracker {
    data: StreakData,
    daily_goal: u32,
    window: usize,
}

impl EngagementTracker {
    /// Wrap persisted streak data
    pub fn new(data: StreakData, daily_goal: u32, window: usize) -> Self {
        Self {
            data,
            daily_goal: daily_goal.max(1),
            window,
        }
    }

    /// Current streak state
    pub fn data(&self) -> &StreakData {
        &self.data
    }

    /// Consume the tracker, returning the data to persist
    pub fn into_data(self) -> StreakData {
        self.data
    }

    /// Plays needed per day
    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Normalize today's progress to `today`
    ///
    /// Returns `true` if a rollover happened. Must run before any other read
    /// of the streak state after rehydration.
    pub fn reconcile_day(&mut self, today: NaiveDate) -> bool {
        let stored = self.data.today_progress.date;
        if stored == today {
            return false;
        }

        if stored > today {
            // Local clock went backwards; restart today's count, keep the streak
            warn!(
                "Stored progress date {} is after today {}, resetting today's progress",
                stored, today
            );
            self.data.today_progress = DailyProgress::new(today);
            return true;
        }

        let continued =
            self.data.today_progress.completed && today.pred_opt() == Some(stored);

        let finished = std::mem::replace(&mut self.data.today_progress, DailyProgress::new(today));
        if finished.quotes_listened > 0 || finished.completed {
            self.data.daily_progress_history.push(finished);
            let excess = self
                .data
                .daily_progress_history
                .len()
                .saturating_sub(self.window);
            self.data.daily_progress_history.drain(..excess);
        }

        if !continued && self.data.current_streak > 0 {
            info!(
                "Streak of {} ended (last progress on {})",
                self.data.current_streak, stored
            );
            self.data.current_streak = 0;
        }

        true
    }

    /// Count one play for `today`
    ///
    /// Returns a celebration exactly once per day, when the count first
    /// reaches the daily goal.
    pub fn record_play(&mut self, today: NaiveDate) -> Option<Celebration> {
        self.reconcile_day(today);

        let progress = &mut self.data.today_progress;
        progress.quotes_listened = progress.quotes_listened.saturating_add(1);

        if progress.completed || progress.quotes_listened < self.daily_goal {
            return None;
        }

        progress.completed = true;
        self.data.current_streak += 1;
        self.data.longest_streak = self.data.longest_streak.max(self.data.current_streak);
        self.data.total_days_completed += 1;
        self.data.last_completed_date = Some(today);
        self.data.celebration_pending = true;

        info!(
            "Daily goal reached: streak {}, {} days total",
            self.data.current_streak, self.data.total_days_completed
        );

        Some(Celebration {
            streak: self.data.current_streak,
            total_days: self.data.total_days_completed,
        })
    }

    /// Acknowledge a pending celebration
    pub fn dismiss_celebration(&mut self) {
        self.data.celebration_pending = false;
    }

    /// Plays still needed today
    pub fn remaining_today(&self) -> u32 {
        self.daily_goal
            .saturating_sub(self.data.today_progress.quotes_listened)
    }

    /// Today's progress toward the goal, clamped to 0.0..=1.0
    pub fn progress_ratio(&self) -> f32 {
        (self.data.today_progress.quotes_listened as f32 / self.daily_goal as f32).min(1.0)
    }

    /// Encouragement tier for the current streak
    pub fn tier(&self) -> StreakTier {
        StreakTier::for_streak(self.data.current_streak)
    }
}

impl Default for EngagementTracker {
    fn default() -> Self {
        Self::new(StreakData::default(), DEFAULT_DAILY_GOAL, DEFAULT_PROGRESS_WINDOW)
    }
}
