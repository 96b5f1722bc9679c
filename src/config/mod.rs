//! Configuration loading and management for the ledger engine.
//!
//! This module loads the attendance policy and persistence settings from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_ledger::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Shift starts at {}", loader.config().attendance.shift_start);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttendancePolicy, LedgerConfig, PersistenceConfig};
