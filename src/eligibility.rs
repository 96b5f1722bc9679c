//! Cross-ledger eligibility policy.
//!
//! The ledgers store records without judging them. [`EligibilityChecker`]
//! reads both of them and decides whether a mutation would leave them
//! contradicting each other, e.g. attendance on a day of approved leave.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{AttendanceStatus, LeaveRequest};
use crate::store::{AttendanceStore, LeaveStore};
use crate::sync::with_timeout;

/// Why an operation was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenialReason {
    /// An approved leave request covers the date.
    OnApprovedLeave {
        /// The covering leave request.
        request_id: String,
    },
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::OnApprovedLeave { request_id } => {
                write!(f, "on approved leave (request {})", request_id)
            }
        }
    }
}

/// The outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The operation may proceed.
    Allowed,
    /// The operation must not proceed.
    Denied(DenialReason),
}

impl Eligibility {
    /// Returns true for [`Eligibility::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed)
    }
}

/// Checks attendance against leave.
///
/// The checker only reads. Callers that act on its answer must hold the
/// staff member's exclusion scope across the check and their write.
#[derive(Debug)]
pub struct EligibilityChecker<A, L> {
    attendance: Arc<A>,
    leave: Arc<L>,
    timeout: Duration,
}

impl<A, L> Clone for EligibilityChecker<A, L> {
    fn clone(&self) -> Self {
        Self {
            attendance: Arc::clone(&self.attendance),
            leave: Arc::clone(&self.leave),
            timeout: self.timeout,
        }
    }
}

impl<A: AttendanceStore, L: LeaveStore> EligibilityChecker<A, L> {
    /// Creates a checker over the two stores.
    pub fn new(attendance: Arc<A>, leave: Arc<L>, timeout: Duration) -> Self {
        Self {
            attendance,
            leave,
            timeout,
        }
    }

    /// Decides whether `staff_id` may check in on `date`.
    ///
    /// Denied with [`DenialReason::OnApprovedLeave`] when an approved leave
    /// request covers the date. Pending and rejected requests never deny.
    pub async fn can_check_in(&self, staff_id: &str, date: NaiveDate) -> LedgerResult<Eligibility> {
        let requests = with_timeout(
            "list_leave_for_staff",
            self.timeout,
            self.leave.list_leave_for_staff(staff_id),
        )
        .await??;

        match requests.iter().find(|request| request.is_approved_on(date)) {
            Some(request) => {
                debug!(staff_id, %date, request_id = %request.id, "Check-in denied by approved leave");
                Ok(Eligibility::Denied(DenialReason::OnApprovedLeave {
                    request_id: request.id.clone(),
                }))
            }
            None => Ok(Eligibility::Allowed),
        }
    }

    /// Lists the dates in `request`'s range on which the staff member
    /// already has non-absent attendance, in date order.
    pub async fn attendance_conflicts(&self, request: &LeaveRequest) -> LedgerResult<Vec<NaiveDate>> {
        let records = with_timeout(
            "list_attendance_for_staff",
            self.timeout,
            self.attendance.list_attendance_for_staff(
                &request.staff_id,
                request.start_date,
                request.end_date,
            ),
        )
        .await??;

        Ok(records
            .into_iter()
            .filter(|record| record.status != AttendanceStatus::Absent)
            .map(|record| record.date)
            .collect())
    }
}
