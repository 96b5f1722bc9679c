//! Time source for the ledgers.
//!
//! Ledgers never read the system clock directly; they ask a [`Clock`], so
//! tests can pin "now" with a [`FixedClock`].

use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Supplies the current timestamp and calendar date.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```
/// use attendance_ledger::clock::{Clock, FixedClock};
/// use chrono::{Duration, NaiveDateTime};
///
/// let start = NaiveDateTime::parse_from_str("2025-11-03 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(Duration::minutes(5));
/// assert_eq!(clock.now(), start + Duration::minutes(5));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_date_of_now() {
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 11, 3)
                .unwrap()
                .and_hms_opt(23, 59, 0)
                .unwrap(),
        );
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());

        clock.advance(Duration::minutes(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 11, 4).unwrap());
    }

    #[test]
    fn test_fixed_clock_set_overrides() {
        let clock = FixedClock::new(NaiveDateTime::MIN);
        let target = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
