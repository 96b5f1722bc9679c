//! Core data models for the attendance and leave ledgers.
//!
//! This module contains the domain records owned by the two ledgers.

mod attendance;
mod leave;
mod summary;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use leave::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
pub use summary::AttendanceSummary;
