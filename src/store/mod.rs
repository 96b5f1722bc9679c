//! Persistence collaborator for the ledgers.
//!
//! The ledgers talk to storage only through [`AttendanceStore`] and
//! [`LeaveStore`]. Implementations must enforce the record-level invariants
//! themselves: inserting a second attendance record for the same
//! `(staff_id, date)` fails with [`LedgerError::Conflict`], closing a closed
//! record fails with [`LedgerError::AlreadyClosed`], and deciding a decided
//! leave request fails with [`LedgerError::AlreadyDecided`].
//!
//! [`LedgerError::Conflict`]: crate::error::LedgerError::Conflict
//! [`LedgerError::AlreadyClosed`]: crate::error::LedgerError::AlreadyClosed
//! [`LedgerError::AlreadyDecided`]: crate::error::LedgerError::AlreadyDecided

mod memory;

use std::future::Future;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::LedgerResult;
use crate::models::{AttendanceRecord, AttendanceStatus, LeaveRequest, LeaveStatus};

pub use memory::MemoryStore;

/// The values written when an attendance record is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutUpdate {
    /// When the staff member checked out.
    pub check_out_time: NaiveDateTime,
    /// Hours worked, already rounded.
    pub working_hours: Decimal,
    /// Status after check-out.
    pub status: AttendanceStatus,
}

/// The values written when a leave request is decided.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveDecisionUpdate {
    /// The terminal status to move to.
    pub status: LeaveStatus,
    /// Who made the decision.
    pub decided_by: String,
    /// When the decision was made.
    pub decided_at: NaiveDateTime,
}

/// Storage for attendance records.
pub trait AttendanceStore: Send + Sync + 'static {
    /// Inserts a new record, failing with `Conflict` if one already exists
    /// for the same staff member and date.
    fn insert_attendance(
        &self,
        record: AttendanceRecord,
    ) -> impl Future<Output = LedgerResult<()>> + Send;

    /// Fetches the record for a staff member on a date.
    fn get_attendance(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = LedgerResult<Option<AttendanceRecord>>> + Send;

    /// Closes an open record and returns it.
    ///
    /// Fails with `NotFound` if no checked-in record exists and with
    /// `AlreadyClosed` if it was already checked out.
    fn close_attendance(
        &self,
        staff_id: &str,
        date: NaiveDate,
        update: CheckOutUpdate,
    ) -> impl Future<Output = LedgerResult<AttendanceRecord>> + Send;

    /// Lists every record on a date, ordered by staff id.
    fn list_attendance_for_date(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = LedgerResult<Vec<AttendanceRecord>>> + Send;

    /// Lists a staff member's records in `from..=to`, ordered by date.
    fn list_attendance_for_staff(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = LedgerResult<Vec<AttendanceRecord>>> + Send;
}

/// Storage for leave requests.
pub trait LeaveStore: Send + Sync + 'static {
    /// Inserts a new request.
    fn insert_leave(&self, request: LeaveRequest)
    -> impl Future<Output = LedgerResult<()>> + Send;

    /// Fetches a request by id.
    fn get_leave(
        &self,
        request_id: &str,
    ) -> impl Future<Output = LedgerResult<Option<LeaveRequest>>> + Send;

    /// Moves a pending request to a terminal status and returns it.
    ///
    /// Fails with `NotFound` if the id is unknown and with `AlreadyDecided`
    /// if the request is no longer pending.
    fn decide_leave(
        &self,
        request_id: &str,
        update: LeaveDecisionUpdate,
    ) -> impl Future<Output = LedgerResult<LeaveRequest>> + Send;

    /// Lists a staff member's requests in insertion order.
    fn list_leave_for_staff(
        &self,
        staff_id: &str,
    ) -> impl Future<Output = LedgerResult<Vec<LeaveRequest>>> + Send;

    /// Lists requests with the given status in insertion order.
    fn list_leave_by_status(
        &self,
        status: LeaveStatus,
    ) -> impl Future<Output = LedgerResult<Vec<LeaveRequest>>> + Send;
}
