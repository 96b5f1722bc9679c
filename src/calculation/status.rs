//! Attendance status classification.
//!
//! A check-in is classified against the configured shift start, and a
//! check-out may downgrade the day to a half day when too few hours were
//! worked.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use crate::config::AttendancePolicy;
use crate::models::AttendanceStatus;

/// Classifies a check-in as present or late.
///
/// A check-in on or before `shift_start + late_grace_minutes` (time of day,
/// second precision) is [`AttendanceStatus::Present`]; anything after is
/// [`AttendanceStatus::Late`].
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::classify_check_in;
/// use attendance_ledger::config::AttendancePolicy;
/// use attendance_ledger::models::AttendanceStatus;
/// use chrono::NaiveDateTime;
///
/// let policy = AttendancePolicy::default(); // 09:00 shift start
/// let at = NaiveDateTime::parse_from_str("2025-11-03 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classify_check_in(at, &policy), AttendanceStatus::Late);
/// ```
pub fn classify_check_in(check_in: NaiveDateTime, policy: &AttendancePolicy) -> AttendanceStatus {
    let cutoff = policy
        .shift_start
        .num_seconds_from_midnight()
        .saturating_add(policy.late_grace_minutes.saturating_mul(60));

    if check_in.time().num_seconds_from_midnight() <= cutoff {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    }
}

/// Determines the status of a record after check-out.
///
/// Fewer than `half_day_threshold` hours makes the day a half day; otherwise
/// the status from check-in is kept.
pub fn classify_check_out(
    current: AttendanceStatus,
    working_hours: Decimal,
    half_day_threshold: Decimal,
) -> AttendanceStatus {
    if working_hours < half_day_threshold {
        AttendanceStatus::HalfDay
    } else {
        current
    }
}
