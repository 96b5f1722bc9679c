//! Working hours calculation.
//!
//! Working hours are derived purely from the check-in and check-out
//! timestamps, independent of how records are stored.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places working hours are rounded to.
pub const WORKING_HOURS_SCALE: u32 = 2;

const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Calculates the hours between check-in and check-out.
///
/// The result is rounded half away from zero to two decimal places. A
/// check-out at or before the check-in yields zero hours.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::calculate_working_hours;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let check_in = NaiveDateTime::parse_from_str("2025-11-03 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let check_out = NaiveDateTime::parse_from_str("2025-11-03 17:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(calculate_working_hours(check_in, check_out), Decimal::new(800, 2));
/// ```
pub fn calculate_working_hours(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Decimal {
    let seconds = (check_out - check_in).num_seconds().max(0);

    (Decimal::from(seconds) / SECONDS_PER_HOUR)
        .round_dp_with_strategy(WORKING_HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_eight_hour_day() {
        let hours = calculate_working_hours(
            make_datetime("2025-11-03 09:05:00"),
            make_datetime("2025-11-03 17:05:00"),
        );
        assert_eq!(hours, dec("8.00"));
    }

    #[test]
    fn test_twenty_minutes_rounds_to_two_places() {
        let hours = calculate_working_hours(
            make_datetime("2025-11-03 09:00:00"),
            make_datetime("2025-11-03 09:20:00"),
        );
        assert_eq!(hours, dec("0.33"));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 18 seconds is exactly 0.005 hours
        let hours = calculate_working_hours(
            make_datetime("2025-11-03 09:00:00"),
            make_datetime("2025-11-03 09:00:18"),
        );
        assert_eq!(hours, dec("0.01"));
    }

    #[test]
    fn test_overnight_span() {
        let hours = calculate_working_hours(
            make_datetime("2025-11-03 22:00:00"),
            make_datetime("2025-11-04 06:30:00"),
        );
        assert_eq!(hours, dec("8.50"));
    }

    #[test]
    fn test_reversed_timestamps_yield_zero() {
        let hours = calculate_working_hours(
            make_datetime("2025-11-03 17:00:00"),
            make_datetime("2025-11-03 09:00:00"),
        );
        assert_eq!(hours, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_hours_are_rounded_elapsed_time(seconds in 0i64..=3 * 86_400) {
            let check_in = make_datetime("2025-11-03 00:00:00");
            let check_out = check_in + chrono::Duration::seconds(seconds);

            let hours = calculate_working_hours(check_in, check_out);
            let exact = Decimal::from(seconds) / Decimal::from(3600);

            prop_assert!(hours >= Decimal::ZERO);
            prop_assert!(hours.scale() <= WORKING_HOURS_SCALE);
            prop_assert!((hours - exact).abs() <= dec("0.005"));
        }
    }
}
