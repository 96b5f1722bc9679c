//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading ledger
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

use super::types::{AttendancePolicy, LedgerConfig, PersistenceConfig};

/// Loads and provides access to ledger configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── attendance.yaml   # Shift start, grace period, half-day threshold
/// └── persistence.yaml  # Store call timeout (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let policy = &loader.config().attendance;
/// println!("Half day below {} hours", policy.half_day_threshold_hours);
/// # Ok::<(), attendance_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// `attendance.yaml` is required. `persistence.yaml` falls back to
    /// [`PersistenceConfig::default`] when absent.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ConfigNotFound`] if `attendance.yaml` is missing
    /// - [`LedgerError::ConfigParseError`] if a file contains invalid YAML
    /// - [`LedgerError::InvalidConfig`] if a value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;

        let persistence_path = path.join("persistence.yaml");
        let persistence = if persistence_path.exists() {
            Self::load_yaml::<PersistenceConfig>(&persistence_path)?
        } else {
            PersistenceConfig::default()
        };

        Self::from_config(LedgerConfig::new(attendance, persistence))
    }

    /// Parses a single YAML document holding both `attendance` and
    /// `persistence` sections.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_ledger::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str(
    ///     "attendance:\n  shift_start: \"08:30:00\"\n  late_grace_minutes: 5\n",
    /// )?;
    /// assert_eq!(loader.config().attendance.late_grace_minutes, 5);
    /// # Ok::<(), attendance_ledger::error::LedgerError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> LedgerResult<Self> {
        let config: LedgerConfig =
            serde_yaml::from_str(yaml).map_err(|e| LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }
}
