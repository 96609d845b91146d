//! Rostering configuration.
//!
//! Every option has a default, so an empty TOML document is a valid
//! configuration.
//!
//! ```
//! use u_roster::config::RosterConfig;
//!
//! let config = RosterConfig::from_toml_str(r#"
//!     weekly_hour_cap = 16
//!     time_limit_secs = 10
//!
//!     [max_shifts_per_day]
//!     enforce = true
//!     max = 1
//! "#).unwrap();
//!
//! assert_eq!(config.weekly_hour_cap, 16);
//! assert_eq!(config.daily_shift_cap(), Some(1));
//! assert_eq!(config.daily_hour_cap(), None);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TICKS_PER_HOUR;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// An optional per-day limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimit {
    /// Whether the limit is applied.
    #[serde(default)]
    pub enforce: bool,
    /// Limit value (shifts or hours, depending on the field).
    pub max: u32,
}

impl DailyLimit {
    /// A disabled limit with a preset threshold.
    pub const fn disabled(max: u32) -> Self {
        Self {
            enforce: false,
            max,
        }
    }

    /// An enforced limit.
    pub const fn enforced(max: u32) -> Self {
        Self { enforce: true, max }
    }

    /// The threshold if enforced.
    pub fn active(&self) -> Option<u32> {
        self.enforce.then_some(self.max)
    }
}

/// Parameters of one weekly rostering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Maximum hours per person per week.
    pub weekly_hour_cap: u32,
    /// Optional cap on shifts per person per day (default: off, 2).
    pub max_shifts_per_day: DailyLimit,
    /// Optional cap on hours per person per day (default: off, 8).
    pub max_daily_hours: DailyLimit,
    /// Wall-clock budget for the solver, in seconds.
    pub time_limit_secs: f64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            weekly_hour_cap: 20,
            max_shifts_per_day: DailyLimit::disabled(2),
            max_daily_hours: DailyLimit::disabled(8),
            time_limit_secs: 30.0,
        }
    }
}

impl RosterConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Sets the weekly hour cap.
    pub fn with_weekly_hour_cap(mut self, hours: u32) -> Self {
        self.weekly_hour_cap = hours;
        self
    }

    /// Enforces a per-day shift-count cap.
    pub fn with_max_shifts_per_day(mut self, max: u32) -> Self {
        self.max_shifts_per_day = DailyLimit::enforced(max);
        self
    }

    /// Enforces a per-day hour cap.
    pub fn with_max_daily_hours(mut self, max: u32) -> Self {
        self.max_daily_hours = DailyLimit::enforced(max);
        self
    }

    /// Sets the solver time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = limit.as_secs_f64();
        self
    }

    /// Checks value ranges.
    ///
    /// `time_limit_secs` must be a non-negative number that fits a `Duration`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_limit_secs must be a non-negative number, got {}",
                self.time_limit_secs
            )));
        }
        if Duration::try_from_secs_f64(self.time_limit_secs).is_err() {
            return Err(ConfigError::Invalid(format!(
                "time_limit_secs is too large for a duration, got {}",
                self.time_limit_secs
            )));
        }
        Ok(())
    }

    /// Weekly cap in quarter-hour ticks.
    pub fn weekly_cap_ticks(&self) -> i64 {
        i64::from(self.weekly_hour_cap) * TICKS_PER_HOUR
    }

    /// Enforced per-day shift cap, if any.
    pub fn daily_shift_cap(&self) -> Option<u32> {
        self.max_shifts_per_day.active()
    }

    /// Enforced per-day hour cap, if any.
    pub fn daily_hour_cap(&self) -> Option<u32> {
        self.max_daily_hours.active()
    }

    /// Solver time budget.
    ///
    /// Out-of-range values that skipped [`validate`](Self::validate) saturate:
    /// too large means unbounded, negative or NaN means no time at all.
    pub fn time_limit(&self) -> Duration {
        match Duration::try_from_secs_f64(self.time_limit_secs) {
            Ok(limit) => limit,
            Err(_) if self.time_limit_secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }
}
