//! tide.toml configuration parser.
//!
//! ```toml
//! [validation]
//! policy = "strict"
//!
//! [[stack]]
//! id = "FargateService-dev"
//!
//! [stack.scaling]
//! strategy = "fixed"
//! fixed_capacity = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tide_autoscale::{
    FixedCapacityProps, ScheduledScalingProps, Strategy, ValidationPolicy, fixed_capacity,
    scheduled_scaling,
};
use tide_core::{CronOptions, Schedule};

use crate::app::App;
use crate::error::{StackError, StackResult};
use crate::service::FargateServiceProps;
use crate::stack::ServiceStackProps;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TideConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default, rename = "stack")]
    pub stacks: Vec<StackConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub service: FargateServiceProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingConfig>,
}

/// The `[stack.scaling]` table, tagged by `strategy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ScalingConfig {
    Fixed(FixedCapacityProps),
    Scheduled(ScheduledScalingProps),
}

impl ScalingConfig {
    pub fn into_strategy(self) -> Strategy {
        match self {
            ScalingConfig::Fixed(props) => fixed_capacity(props),
            ScalingConfig::Scheduled(props) => scheduled_scaling(props),
        }
    }
}

impl TideConfig {
    pub fn from_file(path: &Path) -> StackResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| StackError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> StackResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> StackResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build every configured stack. `policy` overrides the file's
    /// validation policy when set.
    pub fn into_app(self, policy: Option<ValidationPolicy>) -> StackResult<App> {
        let validation = policy.unwrap_or(self.validation.policy);
        let mut app = App::new();
        for stack in self.stacks {
            app.add_stack(
                stack.id,
                ServiceStackProps {
                    scaling_strategy: stack.scaling.map(ScalingConfig::into_strategy),
                    validation,
                    service: stack.service,
                    description: stack.description,
                },
            )?;
        }
        Ok(app)
    }

    /// A dev stack pinned to 10 tasks and a prod stack that scales out to
    /// 50..=200 at 10:00 and back to 10..=200 at 14:00.
    pub fn scaffold() -> StackResult<Self> {
        let at = |hour: &str| {
            Schedule::cron(CronOptions {
                hour: Some(hour.to_string()),
                minute: Some("00".to_string()),
                ..Default::default()
            })
        };

        let prod = ScheduledScalingProps {
            scale_out_min_capacity: Some(50),
            scale_out_max_capacity: Some(200),
            scale_in_min_capacity: Some(10),
            scale_in_max_capacity: Some(200),
            cpu_utilization_pct: Some(50.0),
            memory_utilization_pct: Some(50.0),
            scale_in_cooldown: Some(std::time::Duration::from_secs(2 * 60)),
            scale_out_cooldown: Some(std::time::Duration::from_secs(30)),
            ..ScheduledScalingProps::new(at("10")?, at("14")?)
        };

        Ok(Self {
            validation: ValidationConfig::default(),
            stacks: vec![
                StackConfig {
                    id: "FargateService-dev".to_string(),
                    description: None,
                    service: FargateServiceProps::default(),
                    scaling: Some(ScalingConfig::Fixed(FixedCapacityProps {
                        fixed_capacity: Some(10),
                    })),
                },
                StackConfig {
                    id: "FargateService-prod".to_string(),
                    description: None,
                    service: FargateServiceProps::default(),
                    scaling: Some(ScalingConfig::Scheduled(prod)),
                },
            ],
        })
    }
}
