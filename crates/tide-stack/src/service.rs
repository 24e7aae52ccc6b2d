//! In-memory model of a Fargate service and its scalable target.
//!
//! The model records every registration a strategy makes and refuses the
//! ones a real provider would refuse: a second task-count registration on
//! the same service, or two rules with the same name on one target.

use serde::{Deserialize, Serialize};
use tide_autoscale::{
    CapacityBounds, Cooldowns, HandleError, HandleResult, ScalableService, ScalableTarget,
    UtilizationMetric,
};
use tide_core::Schedule;
use tracing::debug;

/// Task and placement settings for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FargateServiceProps {
    /// ECS cluster the service runs in.
    pub cluster: String,
    /// Task CPU units (256 = 0.25 vCPU).
    pub cpu: u32,
    /// Task memory in MiB.
    pub memory_mib: u32,
    /// Initial task count before any scaling applies.
    pub desired_count: u32,
    pub image: String,
}

impl Default for FargateServiceProps {
    fn default() -> Self {
        Self {
            cluster: "default".to_string(),
            cpu: 256,
            memory_mib: 512,
            desired_count: 1,
            image: "amazon/amazon-ecs-sample".to_string(),
        }
    }
}

/// A scheduled change of the target's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    pub name: String,
    pub schedule: Schedule,
    pub bounds: CapacityBounds,
}

/// A target-tracking policy on a utilization metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTrackingPolicy {
    pub name: String,
    pub metric: UtilizationMetric,
    pub target_pct: f64,
    pub cooldowns: Cooldowns,
}

/// The registered task-count binding of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalableTargetModel {
    pub bounds: CapacityBounds,
    pub scheduled_actions: Vec<ScheduledAction>,
    pub policies: Vec<TargetTrackingPolicy>,
}

impl ScalableTargetModel {
    fn new(bounds: CapacityBounds) -> Self {
        Self {
            bounds,
            scheduled_actions: Vec::new(),
            policies: Vec::new(),
        }
    }
}

impl ScalableTarget for ScalableTargetModel {
    fn attach_scheduled_rule(
        &mut self,
        name: &str,
        schedule: &Schedule,
        bounds: CapacityBounds,
    ) -> HandleResult<()> {
        if self.scheduled_actions.iter().any(|a| a.name == name) {
            return Err(HandleError::DuplicateRule(name.to_string()));
        }
        self.scheduled_actions.push(ScheduledAction {
            name: name.to_string(),
            schedule: schedule.clone(),
            bounds,
        });
        Ok(())
    }

    fn attach_metric_rule(
        &mut self,
        name: &str,
        metric: UtilizationMetric,
        target_pct: f64,
        cooldowns: Cooldowns,
    ) -> HandleResult<()> {
        if self.policies.iter().any(|p| p.name == name) {
            return Err(HandleError::DuplicateRule(name.to_string()));
        }
        self.policies.push(TargetTrackingPolicy {
            name: name.to_string(),
            metric,
            target_pct,
            cooldowns,
        });
        Ok(())
    }
}

/// A Fargate service inside a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct FargateService {
    id: String,
    props: FargateServiceProps,
    scalable_target: Option<ScalableTargetModel>,
}

impl FargateService {
    pub fn new(id: impl Into<String>, props: FargateServiceProps) -> Self {
        Self {
            id: id.into(),
            props,
            scalable_target: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> &FargateServiceProps {
        &self.props
    }

    /// The registered scalable target, if a strategy registered one.
    pub fn scalable_target(&self) -> Option<&ScalableTargetModel> {
        self.scalable_target.as_ref()
    }
}

impl ScalableService for FargateService {
    fn register_capacity_bounds(
        &mut self,
        bounds: CapacityBounds,
    ) -> HandleResult<&mut dyn ScalableTarget> {
        if self.scalable_target.is_some() {
            return Err(HandleError::TargetAlreadyRegistered(self.id.clone()));
        }
        debug!(service = %self.id, %bounds, "task count scaling enabled");
        Ok(self.scalable_target.insert(ScalableTargetModel::new(bounds)))
    }
}
