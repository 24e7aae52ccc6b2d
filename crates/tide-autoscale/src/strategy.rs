//! Scaling strategies — fixed capacity, scheduled plus target tracking.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tide_core::Schedule;
use tracing::debug;

use crate::handle::{CapacityBounds, Cooldowns, HandleResult, ScalableService, UtilizationMetric};

pub const DEFAULT_FIXED_CAPACITY: u32 = 1;
pub const DEFAULT_MIN_CAPACITY: u32 = 1;
pub const DEFAULT_MAX_CAPACITY: u32 = 25;
pub const DEFAULT_SCALE_IN_COOLDOWN: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_SCALE_OUT_COOLDOWN: Duration = Duration::from_secs(30);
pub const DEFAULT_TARGET_CPU_UTILIZATION_PCT: f64 = 20.0;
pub const DEFAULT_TARGET_MEMORY_UTILIZATION_PCT: f64 = 50.0;

pub const SCALE_OUT_RULE: &str = "scale-out";
pub const SCALE_IN_RULE: &str = "scale-in";
pub const CPU_RULE: &str = "CpuScaling";
pub const MEMORY_RULE: &str = "MemoryScaling";

/// How a service's task count is managed.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Pin the task count; no elasticity.
    Fixed(FixedCapacity),
    /// Scheduled bound changes with CPU and memory target tracking inside them.
    Scheduled(ScheduledScaling),
}

impl Strategy {
    /// Apply the strategy to `service`.
    ///
    /// Registers the capacity bounds first, then attaches any rules to the
    /// resulting scalable target. The first handle fault aborts the
    /// application; rules attached before it are left in place.
    pub fn apply(&self, service: &mut dyn ScalableService) -> HandleResult<()> {
        match self {
            Strategy::Fixed(cfg) => cfg.apply(service),
            Strategy::Scheduled(cfg) => cfg.apply(service),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Fixed(_) => "fixed",
            Strategy::Scheduled(_) => "scheduled",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Fixed(cfg) => write!(f, "fixed capacity {}", cfg.capacity),
            Strategy::Scheduled(cfg) => write!(
                f,
                "scheduled: base {} | out {} on {} | in {} on {} | cpu {}% mem {}%",
                cfg.scale_in,
                cfg.scale_out,
                cfg.scale_out_schedule,
                cfg.scale_in,
                cfg.scale_in_schedule,
                cfg.cpu_utilization_pct,
                cfg.memory_utilization_pct,
            ),
        }
    }
}

// ── Fixed capacity ─────────────────────────────────────────────────

/// User-facing options for [`fixed_capacity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedCapacityProps {
    /// Exact task count. Default: 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_capacity: Option<u32>,
}

impl FixedCapacityProps {
    pub fn resolve(self) -> FixedCapacity {
        FixedCapacity {
            capacity: self.fixed_capacity.unwrap_or(DEFAULT_FIXED_CAPACITY),
        }
    }
}

/// Resolved fixed-capacity configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCapacity {
    pub capacity: u32,
}

impl FixedCapacity {
    fn apply(&self, service: &mut dyn ScalableService) -> HandleResult<()> {
        debug!(capacity = self.capacity, "registering fixed capacity");
        service.register_capacity_bounds(CapacityBounds::exact(self.capacity))?;
        Ok(())
    }
}

/// Pin a service to an exact task count.
pub fn fixed_capacity(props: FixedCapacityProps) -> Strategy {
    Strategy::Fixed(props.resolve())
}

// ── Scheduled scaling ──────────────────────────────────────────────

/// User-facing options for [`scheduled_scaling`]. Only the two schedules
/// are required; see the `DEFAULT_*` constants for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledScalingProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_in_min_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_in_max_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_out_min_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_out_max_capacity: Option<u32>,
    /// When to switch to the scale-out bounds.
    pub scale_out_schedule: Schedule,
    /// When to switch back to the scale-in bounds.
    pub scale_in_schedule: Schedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_utilization_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_utilization_pct: Option<f64>,
    #[serde(
        default,
        with = "tide_core::duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale_in_cooldown: Option<Duration>,
    #[serde(
        default,
        with = "tide_core::duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale_out_cooldown: Option<Duration>,
}

impl ScheduledScalingProps {
    /// Props with both schedules set and every other field defaulted.
    pub fn new(scale_out_schedule: Schedule, scale_in_schedule: Schedule) -> Self {
        Self {
            scale_in_min_capacity: None,
            scale_in_max_capacity: None,
            scale_out_min_capacity: None,
            scale_out_max_capacity: None,
            scale_out_schedule,
            scale_in_schedule,
            cpu_utilization_pct: None,
            memory_utilization_pct: None,
            scale_in_cooldown: None,
            scale_out_cooldown: None,
        }
    }

    /// Fill in defaults for every unset field.
    pub fn resolve(self) -> ScheduledScaling {
        ScheduledScaling {
            scale_in: CapacityBounds::new(
                self.scale_in_min_capacity.unwrap_or(DEFAULT_MIN_CAPACITY),
                self.scale_in_max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
            ),
            scale_out: CapacityBounds::new(
                self.scale_out_min_capacity.unwrap_or(DEFAULT_MIN_CAPACITY),
                self.scale_out_max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
            ),
            scale_out_schedule: self.scale_out_schedule,
            scale_in_schedule: self.scale_in_schedule,
            cpu_utilization_pct: self
                .cpu_utilization_pct
                .unwrap_or(DEFAULT_TARGET_CPU_UTILIZATION_PCT),
            memory_utilization_pct: self
                .memory_utilization_pct
                .unwrap_or(DEFAULT_TARGET_MEMORY_UTILIZATION_PCT),
            cooldowns: Cooldowns {
                scale_in: self.scale_in_cooldown.unwrap_or(DEFAULT_SCALE_IN_COOLDOWN),
                scale_out: self.scale_out_cooldown.unwrap_or(DEFAULT_SCALE_OUT_COOLDOWN),
            },
        }
    }
}

/// Resolved scheduled-scaling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledScaling {
    /// Baseline bounds, restored by the scale-in schedule.
    pub scale_in: CapacityBounds,
    /// Bounds applied by the scale-out schedule.
    pub scale_out: CapacityBounds,
    pub scale_out_schedule: Schedule,
    pub scale_in_schedule: Schedule,
    pub cpu_utilization_pct: f64,
    pub memory_utilization_pct: f64,
    pub cooldowns: Cooldowns,
}

impl ScheduledScaling {
    fn apply(&self, service: &mut dyn ScalableService) -> HandleResult<()> {
        debug!(bounds = %self.scale_in, "registering baseline capacity");
        let target = service.register_capacity_bounds(self.scale_in)?;

        debug!(rule = SCALE_OUT_RULE, schedule = %self.scale_out_schedule, bounds = %self.scale_out, "attaching scheduled rule");
        target.attach_scheduled_rule(SCALE_OUT_RULE, &self.scale_out_schedule, self.scale_out)?;

        debug!(rule = SCALE_IN_RULE, schedule = %self.scale_in_schedule, bounds = %self.scale_in, "attaching scheduled rule");
        target.attach_scheduled_rule(SCALE_IN_RULE, &self.scale_in_schedule, self.scale_in)?;

        for (name, metric, pct) in [
            (CPU_RULE, UtilizationMetric::Cpu, self.cpu_utilization_pct),
            (MEMORY_RULE, UtilizationMetric::Memory, self.memory_utilization_pct),
        ] {
            debug!(rule = name, metric = metric.label(), target_pct = pct, "attaching metric rule");
            target.attach_metric_rule(name, metric, pct, self.cooldowns)?;
        }

        Ok(())
    }
}

/// Combine scheduled bound changes with CPU and memory target tracking.
pub fn scheduled_scaling(props: ScheduledScalingProps) -> Strategy {
    Strategy::Scheduled(props.resolve())
}
