//! The scalable-service capability a strategy is applied to.
//!
//! Implemented by whatever owns the running service: the in-memory model
//! in `tide-stack`, or a recording double in tests.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tide_core::Schedule;

/// Result type alias for handle operations.
pub type HandleResult<T> = Result<T, HandleError>;

/// Faults raised by a service handle while a strategy is applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandleError {
    #[error("capacity bounds already registered for service {0}")]
    TargetAlreadyRegistered(String),

    #[error("a rule named {0:?} is already attached to the scalable target")]
    DuplicateRule(String),

    #[error("handle rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },
}

/// Min/max task count for a scalable target or a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityBounds {
    pub min: u32,
    pub max: u32,
}

impl CapacityBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Bounds that pin the service to exactly `n` tasks.
    pub fn exact(n: u32) -> Self {
        Self { min: n, max: n }
    }
}

impl fmt::Display for CapacityBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Utilization metrics a target-tracking rule can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilizationMetric {
    Cpu,
    Memory,
}

impl UtilizationMetric {
    pub fn label(&self) -> &'static str {
        match self {
            UtilizationMetric::Cpu => "cpu",
            UtilizationMetric::Memory => "memory",
        }
    }
}

/// Minimum time between successive scaling actions, per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldowns {
    pub scale_in: Duration,
    pub scale_out: Duration,
}

/// A provisioned service whose task count can be bounded.
pub trait ScalableService {
    /// Register min/max capacity and return the scalable target that
    /// scaling rules attach to.
    fn register_capacity_bounds(
        &mut self,
        bounds: CapacityBounds,
    ) -> HandleResult<&mut dyn ScalableTarget>;
}

/// The registered capacity binding of a service.
pub trait ScalableTarget {
    /// Change the bounds to `bounds` whenever `schedule` fires.
    fn attach_scheduled_rule(
        &mut self,
        name: &str,
        schedule: &Schedule,
        bounds: CapacityBounds,
    ) -> HandleResult<()>;

    /// Track `metric` towards `target_pct` percent utilization.
    fn attach_metric_rule(
        &mut self,
        name: &str,
        metric: UtilizationMetric,
        target_pct: f64,
        cooldowns: Cooldowns,
    ) -> HandleResult<()>;
}
