//! Calculation logic for the attendance and leave ledgers.
//!
//! This module contains the pure functions the ledgers rely on: working
//! hours between two timestamps, present/late/half-day classification, and
//! inclusive leave range arithmetic. None of them touch storage.

mod leave_days;
mod status;
mod working_hours;

pub use leave_days::leave_days;
pub use status::{classify_check_in, classify_check_out};
pub use working_hours::{WORKING_HOURS_SCALE, calculate_working_hours};
