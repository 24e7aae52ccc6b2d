//! Configuration error types shared by the tide crates.

use thiserror::Error;

/// Result type alias for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A scaling configuration value that cannot be used as given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: min capacity {min} is greater than max capacity {max}")]
    InvertedBounds { field: &'static str, min: u32, max: u32 },

    #[error("{field}: utilization target {value}% is outside (0, 100]")]
    UtilizationOutOfRange { field: &'static str, value: f64 },

    #[error("invalid schedule expression {expression:?}: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("{field}: cooldown of {millis}ms is not a whole number of seconds")]
    FractionalCooldown { field: &'static str, millis: u128 },

    #[error("cannot supply both 'day' and 'week_day' in a cron schedule")]
    DayAndWeekDay,
}
