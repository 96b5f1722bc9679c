//! Configuration types for the ledger engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::time::Duration;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};

fn default_shift_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_half_day_threshold_hours() -> Decimal {
    Decimal::new(400, 2)
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Attendance policy applied on check-in and check-out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendancePolicy {
    /// Time of day a shift starts; check-ins after it (plus grace) are late.
    #[serde(default = "default_shift_start")]
    pub shift_start: NaiveTime,
    /// Minutes after `shift_start` that still count as on time.
    #[serde(default)]
    pub late_grace_minutes: u32,
    /// Days with fewer working hours than this are marked half-day.
    #[serde(default = "default_half_day_threshold_hours")]
    pub half_day_threshold_hours: Decimal,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            shift_start: default_shift_start(),
            late_grace_minutes: 0,
            half_day_threshold_hours: default_half_day_threshold_hours(),
        }
    }
}

/// Settings for calls into the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Upper bound on any single store call or lock wait, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl PersistenceConfig {
    /// Returns the timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// The complete ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Attendance policy.
    #[serde(default)]
    pub attendance: AttendancePolicy,
    /// Persistence settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl LedgerConfig {
    /// Creates a configuration from its component parts.
    pub fn new(attendance: AttendancePolicy, persistence: PersistenceConfig) -> Self {
        Self {
            attendance,
            persistence,
        }
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.attendance.half_day_threshold_hours <= Decimal::ZERO {
            return Err(LedgerError::InvalidConfig {
                field: "attendance.half_day_threshold_hours".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.attendance.half_day_threshold_hours > Decimal::from(24) {
            return Err(LedgerError::InvalidConfig {
                field: "attendance.half_day_threshold_hours".to_string(),
                message: "must not exceed 24 hours".to_string(),
            });
        }
        if self.attendance.late_grace_minutes >= 24 * 60 {
            return Err(LedgerError::InvalidConfig {
                field: "attendance.late_grace_minutes".to_string(),
                message: "must be less than a day".to_string(),
            });
        }
        if self.persistence.timeout_ms == 0 {
            return Err(LedgerError::InvalidConfig {
                field: "persistence.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
