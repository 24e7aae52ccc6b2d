//! tide-autoscale — scaling strategies for a scalable compute service.
//!
//! A [`Strategy`] is a deferred, parameterized action. It is built from
//! user configuration by one of the factory functions and applied later to
//! whatever implements [`ScalableService`].
//!
//! # Strategies
//!
//! ```text
//! fixed_capacity      register(n, n)
//!
//! scheduled_scaling   register(in_min, in_max)
//!                     ├── scheduled "scale-out"  → (out_min, out_max)
//!                     ├── scheduled "scale-in"   → (in_min, in_max)
//!                     ├── metric    "CpuScaling"     (cpu %, cooldowns)
//!                     └── metric    "MemoryScaling"  (memory %, cooldowns)
//! ```
//!
//! Under [`ValidationPolicy::Strict`] the resolved configuration is
//! checked before the handle is touched. [`ValidationPolicy::Passthrough`]
//! forwards every value as given.

pub mod apply;
pub mod handle;
pub mod strategy;
pub mod validate;

pub use apply::{ApplyError, ApplyResult, apply_strategy};
pub use handle::{
    CapacityBounds, Cooldowns, HandleError, HandleResult, ScalableService, ScalableTarget,
    UtilizationMetric,
};
pub use strategy::{
    FixedCapacity, FixedCapacityProps, ScheduledScaling, ScheduledScalingProps, Strategy,
    fixed_capacity, scheduled_scaling,
};
pub use validate::ValidationPolicy;
