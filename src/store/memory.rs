//! In-memory store.
//!
//! [`MemoryStore`] keeps both ledgers' records behind async read-write
//! locks. Uniqueness and state checks run under the write lock, so a losing
//! concurrent writer observes an error instead of overwriting.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceRecord, LeaveRequest, LeaveStatus};

use super::{AttendanceStore, CheckOutUpdate, LeaveDecisionUpdate, LeaveStore};

#[derive(Debug, Default)]
struct LeaveTable {
    index: HashMap<String, usize>,
    rows: Vec<LeaveRequest>,
}

/// A store holding every record in process memory.
///
/// The store has an explicit lifecycle: it is usable from [`MemoryStore::open`]
/// until [`MemoryStore::close`], after which every call fails with
/// [`LedgerError::StoreClosed`].
#[derive(Debug)]
pub struct MemoryStore {
    open: AtomicBool,
    attendance: RwLock<BTreeMap<(NaiveDate, String), AttendanceRecord>>,
    leave: RwLock<LeaveTable>,
}

impl MemoryStore {
    /// Opens an empty store.
    pub fn open() -> Self {
        info!("Opening in-memory ledger store");
        Self {
            open: AtomicBool::new(true),
            attendance: RwLock::new(BTreeMap::new()),
            leave: RwLock::new(LeaveTable::default()),
        }
    }

    /// Closes the store. Records are kept but no longer reachable.
    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!("Closed in-memory ledger store");
        }
    }

    /// Returns true until [`MemoryStore::close`] is called.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> LedgerResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(LedgerError::StoreClosed)
        }
    }
}

impl AttendanceStore for MemoryStore {
    async fn insert_attendance(&self, record: AttendanceRecord) -> LedgerResult<()> {
        self.ensure_open()?;
        let mut table = self.attendance.write().await;

        let key = (record.date, record.staff_id.clone());
        if table.contains_key(&key) {
            return Err(LedgerError::Conflict {
                staff_id: record.staff_id,
                date: record.date,
            });
        }

        debug!(staff_id = %record.staff_id, date = %record.date, "Inserted attendance record");
        table.insert(key, record);
        Ok(())
    }

    async fn get_attendance(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<AttendanceRecord>> {
        self.ensure_open()?;
        let table = self.attendance.read().await;
        Ok(table.get(&(date, staff_id.to_string())).cloned())
    }

    async fn close_attendance(
        &self,
        staff_id: &str,
        date: NaiveDate,
        update: CheckOutUpdate,
    ) -> LedgerResult<AttendanceRecord> {
        self.ensure_open()?;
        let mut table = self.attendance.write().await;

        let record = table
            .get_mut(&(date, staff_id.to_string()))
            .filter(|record| record.check_in_time.is_some())
            .ok_or_else(|| {
                LedgerError::not_found("Open attendance record", format!("{staff_id} on {date}"))
            })?;

        if record.is_closed() {
            return Err(LedgerError::AlreadyClosed {
                staff_id: staff_id.to_string(),
                date,
            });
        }

        record.check_out_time = Some(update.check_out_time);
        record.working_hours = update.working_hours;
        record.status = update.status;
        Ok(record.clone())
    }

    async fn list_attendance_for_date(&self, date: NaiveDate) -> LedgerResult<Vec<AttendanceRecord>> {
        self.ensure_open()?;
        let table = self.attendance.read().await;

        Ok(table
            .range((date, String::new())..)
            .take_while(|((record_date, _), _)| *record_date == date)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn list_attendance_for_staff(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Vec<AttendanceRecord>> {
        self.ensure_open()?;
        let table = self.attendance.read().await;

        Ok(table
            .range((from, String::new())..)
            .take_while(|((record_date, _), _)| *record_date <= to)
            .filter(|((_, record_staff), _)| record_staff == staff_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

impl LeaveStore for MemoryStore {
    async fn insert_leave(&self, request: LeaveRequest) -> LedgerResult<()> {
        self.ensure_open()?;
        let mut table = self.leave.write().await;

        if table.index.contains_key(&request.id) {
            return Err(LedgerError::validation(
                "id",
                format!("leave request '{}' already exists", request.id),
            ));
        }

        let position = table.rows.len();
        table.index.insert(request.id.clone(), position);
        table.rows.push(request);
        Ok(())
    }

    async fn get_leave(&self, request_id: &str) -> LedgerResult<Option<LeaveRequest>> {
        self.ensure_open()?;
        let table = self.leave.read().await;

        Ok(table
            .index
            .get(request_id)
            .and_then(|&position| table.rows.get(position))
            .cloned())
    }

    async fn decide_leave(
        &self,
        request_id: &str,
        update: LeaveDecisionUpdate,
    ) -> LedgerResult<LeaveRequest> {
        self.ensure_open()?;
        let mut table = self.leave.write().await;

        let position = *table
            .index
            .get(request_id)
            .ok_or_else(|| LedgerError::not_found("Leave request", request_id))?;
        let request = table
            .rows
            .get_mut(position)
            .ok_or_else(|| LedgerError::not_found("Leave request", request_id))?;

        if request.status.is_terminal() {
            return Err(LedgerError::AlreadyDecided {
                request_id: request_id.to_string(),
                status: request.status,
            });
        }

        request.status = update.status;
        request.decided_by = Some(update.decided_by);
        request.decided_at = Some(update.decided_at);
        Ok(request.clone())
    }

    async fn list_leave_for_staff(&self, staff_id: &str) -> LedgerResult<Vec<LeaveRequest>> {
        self.ensure_open()?;
        let table = self.leave.read().await;

        Ok(table
            .rows
            .iter()
            .filter(|request| request.staff_id == staff_id)
            .cloned()
            .collect())
    }

    async fn list_leave_by_status(&self, status: LeaveStatus) -> LedgerResult<Vec<LeaveRequest>> {
        self.ensure_open()?;
        let table = self.leave.read().await;

        Ok(table
            .rows
            .iter()
            .filter(|request| request.status == status)
            .cloned()
            .collect())
    }
}
