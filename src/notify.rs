//! Notification collaborator.
//!
//! Ledgers report late check-ins and leave decisions to a [`Notifier`]
//! after the mutation has committed. Delivery is fire-and-forget: a failed
//! notification is logged and never rolls back the ledger.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::LeaveStatus;

/// Something that happened in a ledger that others may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A staff member checked in after the shift start.
    LateCheckIn {
        /// The staff member.
        staff_id: String,
        /// The attendance date.
        date: NaiveDate,
        /// When they checked in.
        check_in_time: NaiveDateTime,
    },
    /// A leave request reached a terminal status.
    LeaveDecided {
        /// The leave request id.
        request_id: String,
        /// The staff member who requested the leave.
        staff_id: String,
        /// The terminal status.
        status: LeaveStatus,
        /// Who decided.
        decided_by: String,
    },
}

/// Delivery of a notification failed.
#[derive(Debug, Error)]
#[error("Notification delivery failed: {message}")]
pub struct NotifyError {
    /// What went wrong.
    pub message: String,
}

impl NotifyError {
    /// Creates a delivery error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receives ledger events.
pub trait Notifier: Send + Sync {
    /// Delivers one event.
    fn notify(&self, event: &LedgerEvent) -> Result<(), NotifyError>;
}

/// A notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &LedgerEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Sends `event` and logs, rather than returns, any failure.
pub(crate) fn dispatch(notifier: &dyn Notifier, event: LedgerEvent) {
    if let Err(err) = notifier.notify(&event) {
        warn!(error = %err, event = ?event, "Dropping undeliverable ledger notification");
    }
}
