//! CloudFormation-shaped rendering of a stack.
//!
//! ```text
//! <Service>TaskDef               AWS::ECS::TaskDefinition
//! <Service>                      AWS::ECS::Service
//! <Service>TaskCountTarget       AWS::ApplicationAutoScaling::ScalableTarget
//!   └── ScheduledActions[]         one per scheduled rule
//! <Service>TaskCountTarget<Rule> AWS::ApplicationAutoScaling::ScalingPolicy
//!                                  one per metric rule, TargetTrackingScaling
//! ```

use serde_json::{Map, Value, json};
use tide_autoscale::UtilizationMetric;
use tide_core::duration::whole_seconds;

use crate::service::{FargateService, ScalableTargetModel, ScheduledAction, TargetTrackingPolicy};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Render the template for `service` in stack `stack_id`.
pub fn render(stack_id: &str, description: Option<&str>, service: &FargateService) -> Value {
    let service_id = logical_id(service.id());
    let task_def_id = format!("{service_id}TaskDef");
    let props = service.props();

    let mut resources = Map::new();
    resources.insert(
        task_def_id.clone(),
        json!({
            "Type": "AWS::ECS::TaskDefinition",
            "Properties": {
                "Cpu": props.cpu.to_string(),
                "Memory": props.memory_mib.to_string(),
                "NetworkMode": "awsvpc",
                "RequiresCompatibilities": ["FARGATE"],
                "ContainerDefinitions": [{
                    "Name": "app",
                    "Image": props.image,
                    "Essential": true,
                }],
            },
        }),
    );
    resources.insert(
        service_id.clone(),
        json!({
            "Type": "AWS::ECS::Service",
            "Properties": {
                "Cluster": props.cluster,
                "LaunchType": "FARGATE",
                "DesiredCount": props.desired_count,
                "TaskDefinition": { "Ref": task_def_id },
            },
        }),
    );

    if let Some(target) = service.scalable_target() {
        let target_id = format!("{service_id}TaskCountTarget");
        resources.insert(
            target_id.clone(),
            scalable_target(&props.cluster, &service_id, target),
        );
        for policy in &target.policies {
            let policy_id = format!("{target_id}{}", logical_id(&policy.name));
            let policy_name = format!("{}{policy_id}", logical_id(stack_id));
            resources.insert(policy_id, scaling_policy(&policy_name, &target_id, policy));
        }
    }

    let mut template = Map::new();
    template.insert(
        "AWSTemplateFormatVersion".into(),
        Value::from(TEMPLATE_FORMAT_VERSION),
    );
    if let Some(description) = description {
        template.insert("Description".into(), Value::from(description));
    }
    template.insert("Resources".into(), Value::Object(resources));
    Value::Object(template)
}

fn scalable_target(cluster: &str, service_id: &str, target: &ScalableTargetModel) -> Value {
    let mut properties = json!({
        "MinCapacity": target.bounds.min,
        "MaxCapacity": target.bounds.max,
        "ResourceId": format!("service/{cluster}/{service_id}"),
        "ScalableDimension": "ecs:service:DesiredCount",
        "ServiceNamespace": "ecs",
    });
    if !target.scheduled_actions.is_empty() {
        let actions: Vec<Value> = target.scheduled_actions.iter().map(scheduled_action).collect();
        properties["ScheduledActions"] = Value::Array(actions);
    }
    json!({
        "Type": "AWS::ApplicationAutoScaling::ScalableTarget",
        "Properties": properties,
    })
}

fn scheduled_action(action: &ScheduledAction) -> Value {
    json!({
        "ScheduledActionName": action.name,
        "Schedule": action.schedule.expression_string(),
        "ScalableTargetAction": {
            "MinCapacity": action.bounds.min,
            "MaxCapacity": action.bounds.max,
        },
    })
}

fn scaling_policy(policy_name: &str, target_id: &str, policy: &TargetTrackingPolicy) -> Value {
    json!({
        "Type": "AWS::ApplicationAutoScaling::ScalingPolicy",
        "Properties": {
            "PolicyName": policy_name,
            "PolicyType": "TargetTrackingScaling",
            "ScalingTargetId": { "Ref": target_id },
            "TargetTrackingScalingPolicyConfiguration": {
                "PredefinedMetricSpecification": {
                    "PredefinedMetricType": predefined_metric(policy.metric),
                },
                "TargetValue": policy.target_pct,
                "ScaleInCooldown": whole_seconds(policy.cooldowns.scale_in),
                "ScaleOutCooldown": whole_seconds(policy.cooldowns.scale_out),
            },
        },
    })
}

pub fn predefined_metric(metric: UtilizationMetric) -> &'static str {
    match metric {
        UtilizationMetric::Cpu => "ECSServiceAverageCPUUtilization",
        UtilizationMetric::Memory => "ECSServiceAverageMemoryUtilization",
    }
}

/// Strip everything but ASCII alphanumerics.
pub fn logical_id(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::FargateServiceProps;

    #[test]
    fn logical_ids() {
        assert_eq!(logical_id("FargateService-prod"), "FargateServiceprod");
        assert_eq!(logical_id("scale-out"), "scaleout");
    }

    #[test]
    fn service_without_target() {
        let svc = FargateService::new("FargateService", FargateServiceProps::default());
        let t = render("FargateService-dev", None, &svc);

        assert_eq!(t["AWSTemplateFormatVersion"], "2010-09-09");
        assert!(t.get("Description").is_none());
        let resources = t["Resources"].as_object().unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources["FargateService"]["Type"], "AWS::ECS::Service");
        assert_eq!(
            resources["FargateService"]["Properties"]["TaskDefinition"]["Ref"],
            "FargateServiceTaskDef"
        );
        assert_eq!(resources["FargateServiceTaskDef"]["Properties"]["Cpu"], "256");
    }
}
