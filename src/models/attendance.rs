//! Attendance record model and related types.
//!
//! This module defines the AttendanceRecord struct and AttendanceStatus enum
//! for representing one staff member's attendance on one calendar day.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The attendance status of a staff member for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Checked in on or before the shift start.
    Present,
    /// Checked in after the shift start.
    Late,
    /// Checked out having worked less than the full-day threshold.
    HalfDay,
    /// Marked absent for the day.
    Absent,
}

impl AttendanceStatus {
    /// Returns the snake_case name used in storage and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One staff member's attendance on one calendar day.
///
/// At most one record exists per `(staff_id, date)`. A record moves from
/// open (checked in) to closed (checked out) exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The staff member this record belongs to.
    pub staff_id: String,
    /// The calendar day of the record.
    pub date: NaiveDate,
    /// When the staff member checked in. `None` for records marked absent.
    pub check_in_time: Option<NaiveDateTime>,
    /// When the staff member checked out, once they have.
    pub check_out_time: Option<NaiveDateTime>,
    /// The current attendance status.
    pub status: AttendanceStatus,
    /// Hours between check-in and check-out, rounded to two decimal places.
    pub working_hours: Decimal,
    /// The QR code that authorized the check-in.
    pub qr_code_id: Option<String>,
}

impl AttendanceRecord {
    /// Creates an open record for a check-in.
    pub fn checked_in(
        staff_id: impl Into<String>,
        qr_code_id: impl Into<String>,
        check_in_time: NaiveDateTime,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            staff_id: staff_id.into(),
            date: check_in_time.date(),
            check_in_time: Some(check_in_time),
            check_out_time: None,
            status,
            working_hours: Decimal::ZERO,
            qr_code_id: Some(qr_code_id.into()),
        }
    }

    /// Creates a record marking the staff member absent for `date`.
    pub fn absent(staff_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            staff_id: staff_id.into(),
            date,
            check_in_time: None,
            check_out_time: None,
            status: AttendanceStatus::Absent,
            working_hours: Decimal::ZERO,
            qr_code_id: None,
        }
    }

    /// Returns true if the staff member has checked in but not yet out.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_ledger::models::{AttendanceRecord, AttendanceStatus};
    /// use chrono::NaiveDateTime;
    ///
    /// let at = NaiveDateTime::parse_from_str("2025-11-03 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    /// let record = AttendanceRecord::checked_in("S1", "QR-LOBBY", at, AttendanceStatus::Present);
    /// assert!(record.is_open());
    /// assert!(!record.is_closed());
    /// ```
    pub fn is_open(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }

    /// Returns true if the staff member has checked out.
    pub fn is_closed(&self) -> bool {
        self.check_out_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_checked_in_record_takes_date_from_timestamp() {
        let record = AttendanceRecord::checked_in(
            "S1",
            "QR-1",
            make_datetime("2025-11-03 08:55:00"),
            AttendanceStatus::Present,
        );

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
        assert_eq!(record.working_hours, Decimal::ZERO);
        assert_eq!(record.qr_code_id.as_deref(), Some("QR-1"));
        assert!(record.is_open());
    }

    #[test]
    fn test_absent_record_is_never_open() {
        let record = AttendanceRecord::absent("S1", NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());

        assert_eq!(record.status, AttendanceStatus::Absent);
        assert!(!record.is_open());
        assert!(!record.is_closed());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AttendanceStatus::HalfDay).unwrap();
        assert_eq!(json, "\"half_day\"");
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half_day");
    }

    #[test]
    fn test_deserialize_closed_record() {
        let json = r#"{
            "staff_id": "S1",
            "date": "2025-11-03",
            "check_in_time": "2025-11-03T09:05:00",
            "check_out_time": "2025-11-03T17:05:00",
            "status": "late",
            "working_hours": "8.00",
            "qr_code_id": "QR-LOBBY"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
        assert_eq!(record.working_hours, Decimal::new(800, 2));
        assert!(record.is_closed());
    }
}
