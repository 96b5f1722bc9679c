//! Per-staff attendance summary over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attendance::{AttendanceRecord, AttendanceStatus};

/// Attendance totals for one staff member over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The staff member summarized.
    pub staff_id: String,
    /// First day of the range.
    pub from: NaiveDate,
    /// Last day of the range (inclusive).
    pub to: NaiveDate,
    /// Days with status present.
    pub present_days: u32,
    /// Days with status late.
    pub late_days: u32,
    /// Days with status half-day.
    pub half_days: u32,
    /// Days marked absent.
    pub absent_days: u32,
    /// Days checked in but never checked out.
    pub open_days: u32,
    /// Sum of working hours over closed records.
    pub total_working_hours: Decimal,
}

impl AttendanceSummary {
    /// Folds a staff member's records into a summary.
    ///
    /// Records outside `from..=to` or belonging to another staff member are ignored.
    pub fn from_records<'a>(
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        records: impl IntoIterator<Item = &'a AttendanceRecord>,
    ) -> Self {
        let mut summary = Self {
            staff_id: staff_id.to_string(),
            from,
            to,
            present_days: 0,
            late_days: 0,
            half_days: 0,
            absent_days: 0,
            open_days: 0,
            total_working_hours: Decimal::ZERO,
        };

        for record in records
            .into_iter()
            .filter(|r| r.staff_id == staff_id && from <= r.date && r.date <= to)
        {
            match record.status {
                AttendanceStatus::Present => summary.present_days += 1,
                AttendanceStatus::Late => summary.late_days += 1,
                AttendanceStatus::HalfDay => summary.half_days += 1,
                AttendanceStatus::Absent => summary.absent_days += 1,
            }
            if record.is_open() {
                summary.open_days += 1;
            }
            summary.total_working_hours += record.working_hours;
        }

        summary
    }

    /// Days on which the staff member attended in any capacity.
    pub fn attended_days(&self) -> u32 {
        self.present_days + self.late_days + self.half_days
    }
}
