//! Cooldown durations written as human-readable strings ("30s", "2m").

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{ConfigError, ConfigResult};

/// Parse a duration string like "30s", "2m" or "1h 30m".
pub fn parse(input: &str) -> ConfigResult<Duration> {
    humantime::parse_duration(input.trim()).map_err(|e| ConfigError::InvalidDuration {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Render a duration the way `parse` reads it back.
pub fn format(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

/// Whole seconds, as application autoscaling expects cooldowns.
pub fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs()
}

/// Serde adapter for `Option<Duration>` fields stored as strings.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&format(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
