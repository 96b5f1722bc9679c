//! Attendance ledger.
//!
//! Owns one attendance record per staff member per day. A record is
//! created on check-in (status present or late), closed once on check-out
//! (working hours computed, possibly downgraded to half-day), and never
//! deleted.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::calculation::{calculate_working_hours, classify_check_in, classify_check_out};
use crate::clock::Clock;
use crate::config::AttendancePolicy;
use crate::eligibility::{Eligibility, EligibilityChecker};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::notify::{LedgerEvent, Notifier, dispatch};
use crate::store::{AttendanceStore, CheckOutUpdate, LeaveStore};
use crate::sync::{KeyedLocks, with_timeout};

use super::require_non_blank;

/// The attendance ledger.
///
/// Check-in, check-out and mark-absent for one staff member run inside that
/// staff member's exclusion scope, which the leave ledger also takes when it
/// commits a decision.
pub struct AttendanceLedger<A, L> {
    store: Arc<A>,
    checker: EligibilityChecker<A, L>,
    staff_locks: Arc<KeyedLocks>,
    policy: AttendancePolicy,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl<A: AttendanceStore, L: LeaveStore> AttendanceLedger<A, L> {
    /// Creates a ledger over `store`.
    ///
    /// `staff_locks` must be the same table the leave ledger uses.
    pub fn new(
        store: Arc<A>,
        checker: EligibilityChecker<A, L>,
        staff_locks: Arc<KeyedLocks>,
        policy: AttendancePolicy,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            checker,
            staff_locks,
            policy,
            clock,
            notifier,
            timeout,
        }
    }

    /// Returns the attendance policy in force.
    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    /// Records a check-in for the day of `timestamp`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if `staff_id` or `qr_code_id` is blank
    /// - [`LedgerError::PolicyViolation`] if approved leave covers the day
    /// - [`LedgerError::Conflict`] if the staff member already has a record that day
    /// - [`LedgerError::Timeout`] if the store or the exclusion scope is not
    ///   available in time
    pub async fn check_in(
        &self,
        staff_id: &str,
        qr_code_id: &str,
        timestamp: NaiveDateTime,
    ) -> LedgerResult<AttendanceRecord> {
        require_non_blank("staff_id", staff_id)?;
        require_non_blank("qr_code_id", qr_code_id)?;
        let date = timestamp.date();

        let _scope = self.enter_staff_scope(staff_id).await?;

        if let Eligibility::Denied(reason) = self.checker.can_check_in(staff_id, date).await? {
            warn!(staff_id, %date, %reason, "Rejected check-in");
            return Err(LedgerError::PolicyViolation {
                staff_id: staff_id.to_string(),
                date,
                reason,
            });
        }

        let status = classify_check_in(timestamp, &self.policy);
        let record = AttendanceRecord::checked_in(staff_id, qr_code_id, timestamp, status);
        with_timeout(
            "insert_attendance",
            self.timeout,
            self.store.insert_attendance(record.clone()),
        )
        .await??;

        info!(
            staff_id,
            %date,
            qr_code_id,
            status = %status,
            check_in_time = %timestamp,
            "Checked in"
        );

        if status == AttendanceStatus::Late {
            dispatch(
                self.notifier.as_ref(),
                LedgerEvent::LateCheckIn {
                    staff_id: staff_id.to_string(),
                    date,
                    check_in_time: timestamp,
                },
            );
        }

        Ok(record)
    }

    /// Records a check-in at the current time.
    pub async fn check_in_now(
        &self,
        staff_id: &str,
        qr_code_id: &str,
    ) -> LedgerResult<AttendanceRecord> {
        self.check_in(staff_id, qr_code_id, self.clock.now()).await
    }

    /// Closes the staff member's record for the day of `timestamp`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if there is no checked-in record that day
    /// - [`LedgerError::AlreadyClosed`] if the record was already checked out
    /// - [`LedgerError::Validation`] if `timestamp` is not after the check-in
    /// - [`LedgerError::Timeout`] if the store is not available in time
    pub async fn check_out(
        &self,
        staff_id: &str,
        timestamp: NaiveDateTime,
    ) -> LedgerResult<AttendanceRecord> {
        require_non_blank("staff_id", staff_id)?;
        let date = timestamp.date();

        let _scope = self.enter_staff_scope(staff_id).await?;

        let record = with_timeout(
            "get_attendance",
            self.timeout,
            self.store.get_attendance(staff_id, date),
        )
        .await??;
        let Some(record) = record else {
            return Err(open_record_not_found(staff_id, date));
        };
        let Some(check_in_time) = record.check_in_time else {
            return Err(open_record_not_found(staff_id, date));
        };
        if record.is_closed() {
            return Err(LedgerError::AlreadyClosed {
                staff_id: staff_id.to_string(),
                date,
            });
        }
        if timestamp <= check_in_time {
            return Err(LedgerError::validation(
                "check_out_time",
                format!("must be after check-in at {}", check_in_time),
            ));
        }

        let working_hours = calculate_working_hours(check_in_time, timestamp);
        let status = classify_check_out(
            record.status,
            working_hours,
            self.policy.half_day_threshold_hours,
        );
        let closed = with_timeout(
            "close_attendance",
            self.timeout,
            self.store.close_attendance(
                staff_id,
                date,
                CheckOutUpdate {
                    check_out_time: timestamp,
                    working_hours,
                    status,
                },
            ),
        )
        .await??;

        info!(
            staff_id,
            %date,
            working_hours = %working_hours,
            status = %status,
            "Checked out"
        );
        Ok(closed)
    }

    /// Closes today's record at the current time.
    pub async fn check_out_now(&self, staff_id: &str) -> LedgerResult<AttendanceRecord> {
        self.check_out(staff_id, self.clock.now()).await
    }

    /// Marks the staff member absent on `date`.
    ///
    /// Absence is allowed on days of approved leave. Fails with
    /// [`LedgerError::Conflict`] if any record already exists that day.
    pub async fn mark_absent(&self, staff_id: &str, date: NaiveDate) -> LedgerResult<AttendanceRecord> {
        require_non_blank("staff_id", staff_id)?;

        let _scope = self.enter_staff_scope(staff_id).await?;

        let record = AttendanceRecord::absent(staff_id, date);
        with_timeout(
            "insert_attendance",
            self.timeout,
            self.store.insert_attendance(record.clone()),
        )
        .await??;

        info!(staff_id, %date, "Marked absent");
        Ok(record)
    }

    /// Fetches the staff member's record on `date`.
    pub async fn get_record(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<AttendanceRecord>> {
        with_timeout(
            "get_attendance",
            self.timeout,
            self.store.get_attendance(staff_id, date),
        )
        .await?
    }

    /// Lists every record on `date`, ordered by staff id.
    pub async fn list_for_date(&self, date: NaiveDate) -> LedgerResult<Vec<AttendanceRecord>> {
        with_timeout(
            "list_attendance_for_date",
            self.timeout,
            self.store.list_attendance_for_date(date),
        )
        .await?
    }

    /// Lists the staff member's records in `from..=to`, ordered by date.
    pub async fn list_for_staff(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Vec<AttendanceRecord>> {
        if to < from {
            return Err(LedgerError::validation(
                "to",
                format!("{} is before {}", to, from),
            ));
        }

        with_timeout(
            "list_attendance_for_staff",
            self.timeout,
            self.store.list_attendance_for_staff(staff_id, from, to),
        )
        .await?
    }

    /// Summarizes the staff member's attendance in `from..=to`.
    pub async fn summarize(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<AttendanceSummary> {
        let records = self.list_for_staff(staff_id, from, to).await?;
        Ok(AttendanceSummary::from_records(staff_id, from, to, &records))
    }

    async fn enter_staff_scope(
        &self,
        staff_id: &str,
    ) -> LedgerResult<tokio::sync::OwnedMutexGuard<()>> {
        with_timeout(
            "acquire_staff_scope",
            self.timeout,
            self.staff_locks.acquire(staff_id),
        )
        .await
    }
}

fn open_record_not_found(staff_id: &str, date: NaiveDate) -> LedgerError {
    LedgerError::not_found("Open attendance record", format!("{staff_id} on {date}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::notify::NoopNotifier;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn ledger_with(
        staff_locks: Arc<KeyedLocks>,
        clock: Arc<FixedClock>,
        timeout: Duration,
    ) -> AttendanceLedger<MemoryStore, MemoryStore> {
        let store = Arc::new(MemoryStore::open());
        AttendanceLedger::new(
            Arc::clone(&store),
            EligibilityChecker::new(Arc::clone(&store), Arc::clone(&store), timeout),
            staff_locks,
            AttendancePolicy::default(),
            clock,
            Arc::new(NoopNotifier),
            timeout,
        )
    }

    fn ledger() -> AttendanceLedger<MemoryStore, MemoryStore> {
        ledger_with(
            Arc::new(KeyedLocks::new()),
            Arc::new(FixedClock::new(at(3, 8, 50))),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_on_time_check_in_is_present() {
        let ledger = ledger();

        let record = ledger.check_in("S1", "QR-LOBBY", at(3, 8, 55)).await.unwrap();

        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.date, day(3));
        assert!(record.is_open());
    }

    #[tokio::test]
    async fn test_second_check_in_same_day_conflicts() {
        let ledger = ledger();
        ledger.check_in("S1", "QR-LOBBY", at(3, 8, 55)).await.unwrap();

        let result = ledger.check_in("S1", "QR-KITCHEN", at(3, 13, 0)).await;

        assert!(matches!(result, Err(LedgerError::Conflict { .. })));
        let stored = ledger.get_record("S1", day(3)).await.unwrap().unwrap();
        assert_eq!(stored.qr_code_id.as_deref(), Some("QR-LOBBY"));
    }

    #[tokio::test]
    async fn test_blank_qr_code_is_rejected() {
        let ledger = ledger();

        let result = ledger.check_in("S1", "", at(3, 8, 55)).await;

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert!(ledger.get_record("S1", day(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_short_day_becomes_half_day() {
        let ledger = ledger();
        ledger.check_in("S1", "QR-1", at(3, 9, 0)).await.unwrap();

        let record = ledger.check_out("S1", at(3, 12, 30)).await.unwrap();

        assert_eq!(record.working_hours, dec("3.50"));
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[tokio::test]
    async fn test_check_out_without_check_in_is_not_found() {
        let ledger = ledger();

        let result = ledger.check_out("S1", at(3, 17, 0)).await;

        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_second_check_out_is_already_closed() {
        let ledger = ledger();
        ledger.check_in("S1", "QR-1", at(3, 9, 0)).await.unwrap();
        ledger.check_out("S1", at(3, 17, 0)).await.unwrap();

        let result = ledger.check_out("S1", at(3, 18, 0)).await;

        assert!(matches!(result, Err(LedgerError::AlreadyClosed { .. })));
        let stored = ledger.get_record("S1", day(3)).await.unwrap().unwrap();
        assert_eq!(stored.check_out_time, Some(at(3, 17, 0)));
    }

    #[tokio::test]
    async fn test_check_out_at_check_in_time_is_rejected() {
        let ledger = ledger();
        ledger.check_in("S1", "QR-1", at(3, 9, 0)).await.unwrap();

        let result = ledger.check_out("S1", at(3, 9, 0)).await;

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert!(ledger.get_record("S1", day(3)).await.unwrap().unwrap().is_open());
    }

    #[tokio::test]
    async fn test_absent_day_cannot_be_checked_into_or_out_of() {
        let ledger = ledger();
        ledger.mark_absent("S1", day(3)).await.unwrap();

        assert!(matches!(
            ledger.check_in("S1", "QR-1", at(3, 9, 0)).await,
            Err(LedgerError::Conflict { .. })
        ));
        assert!(matches!(
            ledger.check_out("S1", at(3, 17, 0)).await,
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_check_in_now_uses_clock() {
        let ledger = ledger();

        let record = ledger.check_in_now("S1", "QR-1").await.unwrap();

        assert_eq!(record.check_in_time, Some(at(3, 8, 50)));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_check_out_now_uses_clock() {
        let clock = Arc::new(FixedClock::new(at(3, 8, 50)));
        let ledger = ledger_with(
            Arc::new(KeyedLocks::new()),
            Arc::clone(&clock),
            Duration::from_secs(1),
        );
        ledger.check_in_now("S1", "QR-1").await.unwrap();
        clock.set(at(3, 17, 20));

        let record = ledger.check_out_now("S1").await.unwrap();

        assert_eq!(record.check_out_time, Some(at(3, 17, 20)));
        assert_eq!(record.working_hours, dec("8.50"));
        assert!(record.is_closed());
    }

    #[tokio::test]
    async fn test_held_staff_scope_times_out_check_in() {
        let staff_locks = Arc::new(KeyedLocks::new());
        let ledger = ledger_with(
            Arc::clone(&staff_locks),
            Arc::new(FixedClock::new(at(3, 8, 50))),
            Duration::from_millis(20),
        );
        let _held = staff_locks.acquire("S1").await;

        let result = ledger.check_in("S1", "QR-1", at(3, 9, 0)).await;

        match result {
            Err(LedgerError::Timeout { operation, .. }) => {
                assert_eq!(operation, "acquire_staff_scope");
            }
            other => panic!("Expected Timeout error, got {:?}", other),
        }
        assert!(ledger.get_record("S1", day(3)).await.unwrap().is_none());
        assert!(ledger.check_in("S2", "QR-1", at(3, 9, 0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_for_staff_rejects_reversed_range() {
        let ledger = ledger();

        let result = ledger.list_for_staff("S1", day(5), day(1)).await;

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_summarize_over_week() {
        let ledger = ledger();
        ledger.check_in("S1", "QR-1", at(3, 9, 0)).await.unwrap();
        ledger.check_out("S1", at(3, 17, 0)).await.unwrap();
        ledger.check_in("S1", "QR-1", at(4, 9, 30)).await.unwrap();
        ledger.check_out("S1", at(4, 17, 0)).await.unwrap();
        ledger.mark_absent("S1", day(5)).await.unwrap();

        let summary = ledger.summarize("S1", day(3), day(9)).await.unwrap();

        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.total_working_hours, dec("15.50"));
    }
}
