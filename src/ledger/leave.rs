//! Leave ledger.
//!
//! Owns leave requests. A request is submitted as pending and decided
//! exactly once, to approved or rejected. Requests are never deleted.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::eligibility::EligibilityChecker;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
use crate::notify::{LedgerEvent, Notifier, dispatch};
use crate::store::{AttendanceStore, LeaveDecisionUpdate, LeaveStore};
use crate::sync::{KeyedLocks, with_timeout};

use super::require_non_blank;

/// The leave ledger.
///
/// Decisions on one request are serialized by a per-request exclusion
/// scope. While committing, a decision also holds the requesting staff
/// member's scope (always request first, then staff), so an approval can
/// never interleave with a check-in's eligibility check and write.
pub struct LeaveLedger<A, L> {
    store: Arc<L>,
    checker: EligibilityChecker<A, L>,
    staff_locks: Arc<KeyedLocks>,
    request_locks: KeyedLocks,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl<A: AttendanceStore, L: LeaveStore> LeaveLedger<A, L> {
    /// Creates a ledger over `store`.
    ///
    /// `staff_locks` must be the same table the attendance ledger uses.
    pub fn new(
        store: Arc<L>,
        checker: EligibilityChecker<A, L>,
        staff_locks: Arc<KeyedLocks>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            checker,
            staff_locks,
            request_locks: KeyedLocks::new(),
            clock,
            notifier,
            timeout,
        }
    }

    /// Submits a pending leave request for the inclusive range
    /// `start_date..=end_date`.
    ///
    /// A blank `reason` is stored as `None`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if `end_date` is before `start_date` or
    ///   `staff_id` is blank
    /// - [`LedgerError::Timeout`] if the store is not available in time
    pub async fn submit(
        &self,
        staff_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<&str>,
    ) -> LedgerResult<LeaveRequest> {
        require_non_blank("staff_id", staff_id)?;
        if end_date < start_date {
            return Err(LedgerError::validation(
                "end_date",
                format!("{} is before start_date {}", end_date, start_date),
            ));
        }

        let request = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            staff_id: staff_id.to_string(),
            leave_type,
            start_date,
            end_date,
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            status: LeaveStatus::Pending,
            requested_at: self.clock.now(),
            decided_by: None,
            decided_at: None,
        };

        with_timeout(
            "insert_leave",
            self.timeout,
            self.store.insert_leave(request.clone()),
        )
        .await??;

        info!(
            request_id = %request.id,
            staff_id,
            leave_type = %leave_type,
            %start_date,
            %end_date,
            days = request.days(),
            "Submitted leave request"
        );
        Ok(request)
    }

    /// Decides a pending request.
    ///
    /// Approving a request whose range already has attendance is allowed but
    /// logged.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if `decider_id` is blank
    /// - [`LedgerError::NotFound`] if `request_id` is unknown
    /// - [`LedgerError::AlreadyDecided`] if the request is no longer pending
    /// - [`LedgerError::Timeout`] if the store or an exclusion scope is not
    ///   available in time
    pub async fn decide(
        &self,
        request_id: &str,
        decision: LeaveDecision,
        decider_id: &str,
    ) -> LedgerResult<LeaveRequest> {
        require_non_blank("decider_id", decider_id)?;

        let _request_scope = with_timeout(
            "acquire_request_scope",
            self.timeout,
            self.request_locks.acquire(request_id),
        )
        .await?;

        let request = self
            .get(request_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Leave request", request_id))?;
        if request.status.is_terminal() {
            return Err(LedgerError::AlreadyDecided {
                request_id: request_id.to_string(),
                status: request.status,
            });
        }

        let _staff_scope = with_timeout(
            "acquire_staff_scope",
            self.timeout,
            self.staff_locks.acquire(&request.staff_id),
        )
        .await?;

        if decision == LeaveDecision::Approved {
            let conflicts = self.checker.attendance_conflicts(&request).await?;
            if !conflicts.is_empty() {
                warn!(
                    request_id,
                    staff_id = %request.staff_id,
                    conflicting_dates = ?conflicts,
                    "Approving leave over days with recorded attendance"
                );
            }
        }

        let decided = with_timeout(
            "decide_leave",
            self.timeout,
            self.store.decide_leave(
                request_id,
                LeaveDecisionUpdate {
                    status: decision.into(),
                    decided_by: decider_id.to_string(),
                    decided_at: self.clock.now(),
                },
            ),
        )
        .await??;

        info!(
            request_id,
            staff_id = %decided.staff_id,
            status = %decided.status,
            decided_by = decider_id,
            "Decided leave request"
        );

        dispatch(
            self.notifier.as_ref(),
            LedgerEvent::LeaveDecided {
                request_id: decided.id.clone(),
                staff_id: decided.staff_id.clone(),
                status: decided.status,
                decided_by: decider_id.to_string(),
            },
        );

        Ok(decided)
    }

    /// Fetches a request by id.
    pub async fn get(&self, request_id: &str) -> LedgerResult<Option<LeaveRequest>> {
        with_timeout(
            "get_leave",
            self.timeout,
            self.store.get_leave(request_id),
        )
        .await?
    }

    /// Lists the staff member's requests, most recently requested first.
    pub async fn list_by_staff(&self, staff_id: &str) -> LedgerResult<Vec<LeaveRequest>> {
        let mut requests = with_timeout(
            "list_leave_for_staff",
            self.timeout,
            self.store.list_leave_for_staff(staff_id),
        )
        .await??;

        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(requests)
    }

    /// Lists every pending request, oldest first.
    pub async fn list_pending(&self) -> LedgerResult<Vec<LeaveRequest>> {
        let mut requests = with_timeout(
            "list_leave_by_status",
            self.timeout,
            self.store.list_leave_by_status(LeaveStatus::Pending),
        )
        .await??;

        requests.sort_by(|a, b| a.requested_at.cmp(&b.requested_at));
        Ok(requests)
    }

    /// Returns the approved request covering `date` for the staff member, if any.
    pub async fn approved_covering(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<LeaveRequest>> {
        let requests = with_timeout(
            "list_leave_for_staff",
            self.timeout,
            self.store.list_leave_for_staff(staff_id),
        )
        .await??;

        Ok(requests.into_iter().find(|r| r.is_approved_on(date)))
    }
}
