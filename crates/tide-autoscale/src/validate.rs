//! Configuration checks run before a strategy touches a service.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tide_core::{ConfigError, ConfigResult};
use tracing::warn;

use crate::handle::CapacityBounds;
use crate::strategy::{ScheduledScaling, Strategy};

/// What to do with a configuration the checks would reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Fail before any handle interaction.
    #[default]
    Strict,
    /// Log a warning and forward the values to the handle unchanged.
    Passthrough,
}

impl ValidationPolicy {
    /// Run the checks for `strategy` under this policy.
    pub fn check(&self, strategy: &Strategy) -> ConfigResult<()> {
        match (self, strategy.validate()) {
            (_, Ok(())) => Ok(()),
            (ValidationPolicy::Strict, Err(e)) => Err(e),
            (ValidationPolicy::Passthrough, Err(e)) => {
                warn!(strategy = strategy.kind(), error = %e, "forwarding unchecked scaling configuration");
                Ok(())
            }
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationPolicy::Strict => "strict",
            ValidationPolicy::Passthrough => "passthrough",
        })
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "passthrough" => Ok(ValidationPolicy::Passthrough),
            other => Err(format!(
                "unknown validation policy {other:?} (expected strict or passthrough)"
            )),
        }
    }
}

impl Strategy {
    /// Check the resolved configuration. Fixed capacities are always valid.
    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            Strategy::Fixed(_) => Ok(()),
            Strategy::Scheduled(cfg) => validate_scheduled(cfg),
        }
    }
}

fn validate_scheduled(cfg: &ScheduledScaling) -> ConfigResult<()> {
    check_bounds("scale_in", cfg.scale_in)?;
    check_bounds("scale_out", cfg.scale_out)?;
    check_utilization("cpu_utilization_pct", cfg.cpu_utilization_pct)?;
    check_utilization("memory_utilization_pct", cfg.memory_utilization_pct)?;
    check_cooldown("scale_in_cooldown", cfg.cooldowns.scale_in)?;
    check_cooldown("scale_out_cooldown", cfg.cooldowns.scale_out)?;
    cfg.scale_out_schedule.validate()?;
    cfg.scale_in_schedule.validate()?;
    Ok(())
}

fn check_bounds(field: &'static str, bounds: CapacityBounds) -> ConfigResult<()> {
    if bounds.min > bounds.max {
        return Err(ConfigError::InvertedBounds {
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}

fn check_utilization(field: &'static str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(ConfigError::UtilizationOutOfRange { field, value });
    }
    Ok(())
}

// Cooldowns are rendered in whole seconds.
fn check_cooldown(field: &'static str, cooldown: Duration) -> ConfigResult<()> {
    if cooldown.subsec_nanos() != 0 {
        return Err(ConfigError::FractionalCooldown {
            field,
            millis: cooldown.as_millis(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FixedCapacityProps, ScheduledScalingProps, fixed_capacity, scheduled_scaling};
    use tide_core::Schedule;

    fn props() -> ScheduledScalingProps {
        ScheduledScalingProps::new(
            Schedule::expression("cron(0 10 * * ? *)"),
            Schedule::expression("cron(0 14 * * ? *)"),
        )
    }

    #[test]
    fn defaults_are_valid() {
        scheduled_scaling(props()).validate().unwrap();
    }

    #[test]
    fn fixed_zero_is_valid() {
        fixed_capacity(FixedCapacityProps {
            fixed_capacity: Some(0),
        })
        .validate()
        .unwrap();
    }

    #[test]
    fn inverted_scale_out_bounds() {
        let s = scheduled_scaling(ScheduledScalingProps {
            scale_out_min_capacity: Some(30),
            scale_out_max_capacity: Some(20),
            ..props()
        });
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigError::InvertedBounds {
                field: "scale_out",
                min: 30,
                max: 20
            }
        );
    }

    #[test]
    fn inverted_scale_in_bounds_from_defaults() {
        // Default max is 25.
        let s = scheduled_scaling(ScheduledScalingProps {
            scale_in_min_capacity: Some(40),
            ..props()
        });
        assert!(matches!(
            s.validate(),
            Err(ConfigError::InvertedBounds { field: "scale_in", .. })
        ));
    }

    #[test]
    fn utilization_range() {
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            let s = scheduled_scaling(ScheduledScalingProps {
                memory_utilization_pct: Some(bad),
                ..props()
            });
            assert!(matches!(
                s.validate(),
                Err(ConfigError::UtilizationOutOfRange { field: "memory_utilization_pct", .. })
            ));
        }
        let s = scheduled_scaling(ScheduledScalingProps {
            cpu_utilization_pct: Some(100.0),
            ..props()
        });
        s.validate().unwrap();
    }

    #[test]
    fn malformed_schedule() {
        let s = scheduled_scaling(ScheduledScalingProps {
            scale_in_schedule: Schedule::expression("at ten"),
            ..props()
        });
        assert!(matches!(s.validate(), Err(ConfigError::InvalidSchedule { .. })));
    }

    #[test]
    fn sub_second_cooldowns() {
        let s = scheduled_scaling(ScheduledScalingProps {
            scale_in_cooldown: Some(Duration::from_millis(1500)),
            ..props()
        });
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigError::FractionalCooldown {
                field: "scale_in_cooldown",
                millis: 1500
            }
        );

        let s = scheduled_scaling(ScheduledScalingProps {
            scale_out_cooldown: Some(Duration::from_millis(400)),
            ..props()
        });
        assert!(matches!(
            s.validate(),
            Err(ConfigError::FractionalCooldown { field: "scale_out_cooldown", .. })
        ));
        assert!(ValidationPolicy::Passthrough.check(&s).is_ok());

        let s = scheduled_scaling(ScheduledScalingProps {
            scale_out_cooldown: Some(Duration::ZERO),
            ..props()
        });
        s.validate().unwrap();
    }

    #[test]
    fn passthrough_accepts_invalid() {
        let s = scheduled_scaling(ScheduledScalingProps {
            scale_out_min_capacity: Some(99),
            scale_out_max_capacity: Some(1),
            ..props()
        });
        assert!(ValidationPolicy::Strict.check(&s).is_err());
        assert!(ValidationPolicy::Passthrough.check(&s).is_ok());
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("strict".parse::<ValidationPolicy>().unwrap(), ValidationPolicy::Strict);
        assert_eq!(
            "Passthrough".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Passthrough
        );
        assert!("lenient".parse::<ValidationPolicy>().is_err());
        assert_eq!(ValidationPolicy::default(), ValidationPolicy::Strict);
    }
}
