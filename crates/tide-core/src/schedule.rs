//! Application autoscaling schedule expressions.
//!
//! A [`Schedule`] is the recurrence that triggers a scheduled capacity
//! change. Three forms are understood:
//!
//! ```text
//! cron(<minute> <hour> <day-of-month> <month> <day-of-week> <year>)
//! rate(<n> minute|minutes|hour|hours|day|days)
//! at(yyyy-mm-ddThh:mm:ss)
//! ```
//!
//! Builders (`cron`, `rate`, `at`) validate what they produce.
//! `Schedule::expression` wraps any string unchecked; call
//! [`Schedule::validate`] to check it.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, ConfigResult};

static CRON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^cron\((.+)\)$").expect("static regex"));
static CRON_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z*?,/#-]+$").expect("static regex"));
static RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rate\((\d+) (minute|minutes|hour|hours|day|days)\)$").expect("static regex")
});
static AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^at\((\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})\)$").expect("static regex")
});
static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("static regex"));

/// Fields of a cron schedule. Unset fields become `*`, except that the
/// day-of-month and day-of-week fields use `?` as required by application
/// autoscaling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronOptions {
    pub minute: Option<String>,
    pub hour: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub week_day: Option<String>,
    pub year: Option<String>,
}

/// A schedule expression for a scheduled scaling action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    expression: String,
}

impl Schedule {
    /// Wrap a raw expression without checking it.
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Build a cron schedule from its fields. The rendered expression must
    /// pass [`Schedule::validate`].
    pub fn cron(options: CronOptions) -> ConfigResult<Self> {
        if options.day.is_some() && options.week_day.is_some() {
            return Err(ConfigError::DayAndWeekDay);
        }

        let minute = options.minute.unwrap_or_else(|| "*".into());
        let hour = options.hour.unwrap_or_else(|| "*".into());
        let day_default = if options.week_day.is_some() { "?" } else { "*" };
        let day = options.day.unwrap_or_else(|| day_default.into());
        let month = options.month.unwrap_or_else(|| "*".into());
        let week_day = options.week_day.unwrap_or_else(|| "?".into());
        let year = options.year.unwrap_or_else(|| "*".into());

        let schedule = Self::expression(format!(
            "cron({minute} {hour} {day} {month} {week_day} {year})"
        ));
        schedule.validate()?;
        Ok(schedule)
    }

    /// Build a fixed-interval schedule, expressed in the largest whole unit.
    pub fn rate(interval: Duration) -> ConfigResult<Self> {
        let secs = interval.as_secs();
        let invalid = |reason: &str| ConfigError::InvalidSchedule {
            expression: format!("rate({secs}s)"),
            reason: reason.to_string(),
        };

        if secs == 0 {
            return Err(invalid("rate interval cannot be zero"));
        }
        if secs % 60 != 0 || interval.subsec_nanos() != 0 {
            return Err(invalid("rate interval must be a whole number of minutes"));
        }

        let minutes = secs / 60;
        let (n, unit) = if minutes % (60 * 24) == 0 {
            (minutes / (60 * 24), "day")
        } else if minutes % 60 == 0 {
            (minutes / 60, "hour")
        } else {
            (minutes, "minute")
        };
        let plural = if n == 1 { "" } else { "s" };

        Ok(Self::expression(format!("rate({n} {unit}{plural})")))
    }

    /// Build a one-shot schedule from a `yyyy-mm-ddThh:mm:ss` timestamp.
    pub fn at(timestamp: &str) -> ConfigResult<Self> {
        if !TIMESTAMP_RE.is_match(timestamp) {
            return Err(ConfigError::InvalidSchedule {
                expression: format!("at({timestamp})"),
                reason: "timestamp must look like yyyy-mm-ddThh:mm:ss".into(),
            });
        }
        Ok(Self::expression(format!("at({timestamp})")))
    }

    pub fn expression_string(&self) -> &str {
        &self.expression
    }

    /// Check that the expression is a well-formed cron, rate or at schedule.
    pub fn validate(&self) -> ConfigResult<()> {
        let expr = self.expression.as_str();
        let invalid = |reason: String| ConfigError::InvalidSchedule {
            expression: expr.to_string(),
            reason,
        };

        if let Some(caps) = CRON_RE.captures(expr) {
            let fields: Vec<&str> = caps[1].split_whitespace().collect();
            if fields.len() != 6 {
                return Err(invalid(format!(
                    "cron expression needs 6 fields, found {}",
                    fields.len()
                )));
            }
            if let Some(bad) = fields.iter().find(|f| !CRON_FIELD_RE.is_match(f)) {
                return Err(invalid(format!("unexpected characters in cron field {bad:?}")));
            }
            if fields[2] != "?" && fields[4] != "?" {
                return Err(invalid(
                    "one of day-of-month or day-of-week must be '?'".into(),
                ));
            }
            return Ok(());
        }

        if let Some(caps) = RATE_RE.captures(expr) {
            let n: u64 = caps[1]
                .parse()
                .map_err(|_| invalid("rate value is not a number".into()))?;
            let singular = !caps[2].ends_with('s');
            if n == 0 {
                return Err(invalid("rate value must be at least 1".into()));
            }
            if (n == 1) != singular {
                return Err(invalid("rate unit must be singular for 1 and plural otherwise".into()));
            }
            return Ok(());
        }

        if AT_RE.is_match(expr) {
            return Ok(());
        }

        Err(invalid("expected cron(...), rate(...) or at(...)".into()))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for Schedule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let schedule = Self::expression(s.trim());
        schedule.validate()?;
        Ok(schedule)
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.expression)
    }
}

// Deserialization does not validate; the caller's validation policy decides.
impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(Self::expression(raw))
    }
}
