//! Attendance & Leave Ledger
//!
//! This crate records staff check-ins and check-outs, tracks leave requests
//! through their approval lifecycle, and refuses attendance that would
//! contradict approved leave.

#![warn(missing_docs)]

pub mod calculation;
pub mod clock;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod store;
pub mod sync;
