//! Error types for the attendance and leave ledgers.
//!
//! Every ledger operation returns [`LedgerError`] on failure. A failed
//! mutating call leaves the affected record unchanged.

use chrono::NaiveDate;
use thiserror::Error;

use crate::eligibility::DenialReason;
use crate::models::LeaveStatus;

/// The main error type for the ledger engine.
///
/// # Example
///
/// ```
/// use attendance_ledger::error::LedgerError;
/// use chrono::NaiveDate;
///
/// let error = LedgerError::Conflict {
///     staff_id: "S1".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Attendance already recorded for staff 'S1' on 2025-11-03"
/// );
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input was malformed and was rejected before any mutation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending input field.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A record already exists for the staff member on that date.
    #[error("Attendance already recorded for staff '{staff_id}' on {date}")]
    Conflict {
        /// The staff member.
        staff_id: String,
        /// The calendar date of the existing record.
        date: NaiveDate,
    },

    /// The attendance record has already been checked out.
    #[error("Attendance for staff '{staff_id}' on {date} is already closed")]
    AlreadyClosed {
        /// The staff member.
        staff_id: String,
        /// The calendar date of the closed record.
        date: NaiveDate,
    },

    /// The leave request is already in a terminal state.
    #[error("Leave request '{request_id}' has already been {status}")]
    AlreadyDecided {
        /// The leave request id.
        request_id: String,
        /// The terminal status the request is in.
        status: LeaveStatus,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The key used for the lookup.
        key: String,
    },

    /// An eligibility rule denied the operation.
    #[error("Check-in denied for staff '{staff_id}' on {date}: {reason}")]
    PolicyViolation {
        /// The staff member.
        staff_id: String,
        /// The date the check-in was attempted for.
        date: NaiveDate,
        /// Why the check-in was denied.
        reason: DenialReason,
    },

    /// The persistence collaborator did not answer in time.
    #[error("Operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout that expired, in milliseconds.
        timeout_ms: u64,
    },

    /// The persistence handle was used after it was closed.
    #[error("Store is closed")]
    StoreClosed,

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The configuration key.
        field: String,
        /// A description of the problem.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for a [`LedgerError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`LedgerError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Returns true if the caller may retry the whole operation.
    ///
    /// Only timeouts are retryable; no partial state is left behind by them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
