//! Calendar source for daily progress

use chrono::{Days, NaiveDate};
use std::sync::Mutex;

/// Supplies today's date in the local calendar
pub trait Clock: Send + Sync {
    /// Current local date
    fn today(&self) -> NaiveDate;
}

/// Local system calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Manually controlled calendar
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Start at `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Jump to another date
    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = date;
    }

    /// Move forward by `days`
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
