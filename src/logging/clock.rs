//! Wall-clock abstraction
//!
//! Rotation decisions are made on local calendar days. Everything that needs
//! "now" goes through a [`Clock`] so day boundaries can be driven by tests.

use std::fmt;
use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Source of the current local time
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current local time, without timezone
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar day
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Create a clock frozen at noon of the given day
    pub fn at_day(day: NaiveDate) -> Self {
        Self::new(day.and_hms_opt(12, 0, 0).unwrap_or_default())
    }

    /// Move the clock to a new instant
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Move the clock forward by whole days
    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = ManualClock::at_day(day);
        assert_eq!(clock.today(), day);

        clock.advance_days(3);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_system_clock_matches_local_date() {
        let before = Local::now().date_naive();
        let today = SystemClock.today();
        let after = Local::now().date_naive();
        assert!(today == before || today == after);
    }
}
