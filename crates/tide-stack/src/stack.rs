//! A stack holding one Fargate service and its scaling strategy.

use serde_json::Value;
use tide_autoscale::{Strategy, ValidationPolicy, apply_strategy};
use tracing::info;

use crate::error::{StackError, StackResult};
use crate::service::{FargateService, FargateServiceProps};
use crate::template;

/// Logical id of the service inside every stack.
pub const SERVICE_ID: &str = "FargateService";

/// Everything a [`ServiceStack`] is built from.
#[derive(Debug, Clone, Default)]
pub struct ServiceStackProps {
    /// Applied to the service once it exists. `None` leaves the service at
    /// its static desired count with no autoscaling.
    pub scaling_strategy: Option<Strategy>,
    pub validation: ValidationPolicy,
    pub service: FargateServiceProps,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServiceStack {
    id: String,
    description: Option<String>,
    strategy: Option<Strategy>,
    service: FargateService,
}

impl ServiceStack {
    /// Build the service and apply the scaling strategy, if any.
    ///
    /// Any configuration or handle error aborts construction.
    pub fn new(id: impl Into<String>, props: ServiceStackProps) -> StackResult<Self> {
        let id = id.into();
        let ServiceStackProps {
            scaling_strategy,
            validation,
            service,
            description,
        } = props;

        let mut service = FargateService::new(SERVICE_ID, service);
        apply_strategy(scaling_strategy.as_ref(), validation, &mut service).map_err(|source| {
            StackError::Apply {
                stack: id.clone(),
                source,
            }
        })?;

        info!(
            stack = %id,
            strategy = scaling_strategy.as_ref().map_or("none", Strategy::kind),
            "stack assembled"
        );

        Ok(Self {
            id,
            description,
            strategy: scaling_strategy,
            service,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    pub fn service(&self) -> &FargateService {
        &self.service
    }

    /// Render the stack as a CloudFormation-shaped template.
    pub fn template(&self) -> Value {
        template::render(&self.id, self.description.as_deref(), &self.service)
    }
}
