//! Engine configuration.
//!
//! Tunables for the booking engine: how long a caller may wait on a
//! vehicle's lock scope before giving up, and the bounds on acceptable
//! rental durations. Loaded from TOML when embedded in a service, or built
//! in code for tests.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{GearshareError, Result};

/// Booking engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum time to wait for a vehicle's lock scope, in milliseconds.
    /// Exceeding it fails the call with `Busy` instead of queueing forever.
    pub lock_wait_ms: u64,

    /// Shortest rental a client may request, in minutes.
    pub min_booking_minutes: u32,

    /// Longest rental a client may request, in days.
    pub max_booking_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_wait_ms: 5_000,
            min_booking_minutes: 30,
            max_booking_days: 30,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed values fail [`EngineConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Checks that the configured values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`GearshareError::ConfigValidation`] if any bound is zero or
    /// the minimum duration exceeds the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.lock_wait_ms == 0 {
            return Err(GearshareError::ConfigValidation(
                "lock_wait_ms must be positive".into(),
            ));
        }
        if self.min_booking_minutes == 0 {
            return Err(GearshareError::ConfigValidation(
                "min_booking_minutes must be positive".into(),
            ));
        }
        if self.max_booking_days == 0 {
            return Err(GearshareError::ConfigValidation(
                "max_booking_days must be positive".into(),
            ));
        }
        if self.min_booking_duration() > self.max_booking_duration() {
            return Err(GearshareError::ConfigValidation(format!(
                "min_booking_minutes ({}) exceeds max_booking_days ({})",
                self.min_booking_minutes, self.max_booking_days
            )));
        }
        Ok(())
    }

    /// The shortest acceptable rental duration.
    #[must_use]
    pub fn min_booking_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.min_booking_minutes))
    }

    /// The longest acceptable rental duration.
    #[must_use]
    pub fn max_booking_duration(&self) -> Duration {
        Duration::days(i64::from(self.max_booking_days))
    }

    /// The lock-scope acquisition deadline as a std duration.
    #[must_use]
    pub const fn lock_wait(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.lock_wait_ms)
    }
}
