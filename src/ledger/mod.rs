//! The attendance and leave ledgers.
//!
//! Each ledger owns one kind of record and guards its invariants. Policy
//! that spans both ledgers lives in [`crate::eligibility`].

mod attendance;
mod leave;

pub use attendance::AttendanceLedger;
pub use leave::LeaveLedger;

use crate::error::{LedgerError, LedgerResult};

fn require_non_blank(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, "must not be blank"));
    }
    Ok(())
}
