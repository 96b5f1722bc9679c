//! Wiring for the two ledgers and the eligibility checker.
//!
//! [`LedgerEngine`] is built once at process start around an explicitly
//! passed persistence handle and shared by every request handler.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::eligibility::EligibilityChecker;
use crate::error::LedgerResult;
use crate::ledger::{AttendanceLedger, LeaveLedger};
use crate::notify::{NoopNotifier, Notifier};
use crate::store::{AttendanceStore, LeaveStore, MemoryStore};
use crate::sync::KeyedLocks;

/// The attendance ledger, leave ledger and eligibility checker over one store.
///
/// # Example
///
/// ```
/// use attendance_ledger::config::LedgerConfig;
/// use attendance_ledger::engine::LedgerEngine;
/// use chrono::NaiveDateTime;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// runtime.block_on(async {
///     let engine = LedgerEngine::in_memory(&LedgerConfig::default()).unwrap();
///     let at = NaiveDateTime::parse_from_str("2025-11-03 08:58:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
///     let record = engine.attendance().check_in("S1", "QR-LOBBY", at).await.unwrap();
///     assert!(record.is_open());
///
///     engine.shutdown();
/// });
/// ```
pub struct LedgerEngine<S> {
    store: Arc<S>,
    checker: EligibilityChecker<S, S>,
    attendance: AttendanceLedger<S, S>,
    leave: LeaveLedger<S, S>,
}

impl<S: AttendanceStore + LeaveStore> LedgerEngine<S> {
    /// Builds the engine over `store`.
    ///
    /// Both ledgers share one per-staff lock table. Fails with
    /// [`LedgerError::InvalidConfig`](crate::error::LedgerError::InvalidConfig)
    /// if `config` does not validate.
    pub fn new(
        config: &LedgerConfig,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> LedgerResult<Self> {
        config.validate()?;

        let timeout = config.persistence.timeout();
        let staff_locks = Arc::new(KeyedLocks::new());
        let checker = EligibilityChecker::new(Arc::clone(&store), Arc::clone(&store), timeout);

        let attendance = AttendanceLedger::new(
            Arc::clone(&store),
            checker.clone(),
            Arc::clone(&staff_locks),
            config.attendance.clone(),
            Arc::clone(&clock),
            Arc::clone(&notifier),
            timeout,
        );
        let leave = LeaveLedger::new(
            Arc::clone(&store),
            checker.clone(),
            staff_locks,
            clock,
            notifier,
            timeout,
        );

        Ok(Self {
            store,
            checker,
            attendance,
            leave,
        })
    }

    /// Returns the attendance ledger.
    pub fn attendance(&self) -> &AttendanceLedger<S, S> {
        &self.attendance
    }

    /// Returns the leave ledger.
    pub fn leave(&self) -> &LeaveLedger<S, S> {
        &self.leave
    }

    /// Returns the eligibility checker.
    pub fn eligibility(&self) -> &EligibilityChecker<S, S> {
        &self.checker
    }

    /// Returns the persistence handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl LedgerEngine<MemoryStore> {
    /// Opens a fresh in-memory store and builds an engine with the system
    /// clock and no notifications.
    pub fn in_memory(config: &LedgerConfig) -> LedgerResult<Self> {
        Self::new(
            config,
            Arc::new(MemoryStore::open()),
            Arc::new(SystemClock),
            Arc::new(NoopNotifier),
        )
    }

    /// Closes the store. Every later ledger call fails with `StoreClosed`.
    pub fn shutdown(&self) {
        self.store.close();
    }
}
