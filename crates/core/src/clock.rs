//! Wall-clock abstraction so "the current year" can be fixed in tests.

use chrono::{DateTime, Datelike, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn current_year(&self) -> i32 {
        self.now().year()
    }

    fn current_month(&self) -> u32 {
        self.now().month()
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at midnight UTC on the first day of `month`/`year`.
    ///
    /// Returns `None` for an invalid month.
    pub fn at_month(year: i32, month: u32) -> Option<Self> {
        let date = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self(date.and_hms_opt(0, 0, 0)?.and_utc()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_its_year_and_month() {
        let clock = FixedClock::at_month(2031, 7).unwrap();

        assert_eq!(clock.current_year(), 2031);
        assert_eq!(clock.current_month(), 7);
    }

    #[test]
    fn test_fixed_clock_rejects_invalid_month() {
        assert!(FixedClock::at_month(2031, 13).is_none());
    }
}
