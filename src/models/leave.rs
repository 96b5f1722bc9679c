//! Leave request model and related types.
//!
//! This module defines the LeaveRequest struct together with the
//! LeaveType, LeaveStatus and LeaveDecision enums.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calculation::leave_days;

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Annual leave.
    Annual,
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Casual => write!(f, "casual"),
            LeaveType::Annual => write!(f, "annual"),
        }
    }
}

/// The approval status of a leave request.
///
/// `Pending` is the only non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by an approver.
    Approved,
    /// Rejected by an approver.
    Rejected,
}

impl LeaveStatus {
    /// Returns true if no further transition is permitted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// An approver's decision on a pending leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// Approve the request.
    Approved,
    /// Reject the request.
    Rejected,
}

impl From<LeaveDecision> for LeaveStatus {
    fn from(decision: LeaveDecision) -> Self {
        match decision {
            LeaveDecision::Approved => LeaveStatus::Approved,
            LeaveDecision::Rejected => LeaveStatus::Rejected,
        }
    }
}

/// A staff member's request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The staff member requesting leave.
    pub staff_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Optional free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// The approval status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub requested_at: NaiveDateTime,
    /// Who decided the request, once decided.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When the request was decided, once decided.
    #[serde(default)]
    pub decided_at: Option<NaiveDateTime>,
}

impl LeaveRequest {
    /// Returns true if `date` falls within the inclusive leave range.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_ledger::models::{LeaveRequest, LeaveStatus, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2025, 11, d).unwrap();
    /// let request = LeaveRequest {
    ///     id: "L1".to_string(),
    ///     staff_id: "S2".to_string(),
    ///     leave_type: LeaveType::Annual,
    ///     start_date: day(2),
    ///     end_date: day(4),
    ///     reason: None,
    ///     status: LeaveStatus::Approved,
    ///     requested_at: day(1).and_hms_opt(10, 0, 0).unwrap(),
    ///     decided_by: None,
    ///     decided_at: None,
    /// };
    /// assert!(request.covers(day(4)));
    /// assert!(!request.covers(day(5)));
    /// assert_eq!(request.days(), 3);
    /// ```
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Returns the number of calendar days in the leave range.
    pub fn days(&self) -> i64 {
        leave_days(self.start_date, self.end_date)
    }

    /// Returns true if this is an approved request covering `date`.
    pub fn is_approved_on(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.covers(date)
    }
}
