//! Leave range arithmetic.

use chrono::NaiveDate;

/// Returns the number of calendar days in an inclusive date range.
///
/// A range whose end precedes its start has zero days.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::leave_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 11, 4).unwrap();
/// assert_eq!(leave_days(start, end), 3);
/// ```
pub fn leave_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    if end_date < start_date {
        return 0;
    }
    (end_date - start_date).num_days() + 1
}
