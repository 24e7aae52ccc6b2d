//! Call sequences a strategy produces against a recording service.

use std::time::Duration;

use tide_autoscale::*;
use tide_core::Schedule;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Register(u32, u32),
    Scheduled {
        name: String,
        schedule: String,
        min: u32,
        max: u32,
    },
    Metric {
        name: String,
        metric: UtilizationMetric,
        target_pct: f64,
        scale_in_secs: u64,
        scale_out_secs: u64,
    },
}

#[derive(Default)]
struct RecordingService {
    calls: Vec<Call>,
    fail_on_rule: Option<String>,
}

impl ScalableService for RecordingService {
    fn register_capacity_bounds(
        &mut self,
        bounds: CapacityBounds,
    ) -> HandleResult<&mut dyn ScalableTarget> {
        self.calls.push(Call::Register(bounds.min, bounds.max));
        Ok(self)
    }
}

impl ScalableTarget for RecordingService {
    fn attach_scheduled_rule(
        &mut self,
        name: &str,
        schedule: &Schedule,
        bounds: CapacityBounds,
    ) -> HandleResult<()> {
        if self.fail_on_rule.as_deref() == Some(name) {
            return Err(HandleError::DuplicateRule(name.to_string()));
        }
        self.calls.push(Call::Scheduled {
            name: name.to_string(),
            schedule: schedule.to_string(),
            min: bounds.min,
            max: bounds.max,
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
        if self.fail_on_rule.as_deref() == Some(name) {
            return Err(HandleError::DuplicateRule(name.to_string()));
        }
        self.calls.push(Call::Metric {
            name: name.to_string(),
            metric,
            target_pct,
            scale_in_secs: cooldowns.scale_in.as_secs(),
            scale_out_secs: cooldowns.scale_out.as_secs(),
        });
        Ok(())
    }
}

fn cron(hour: &str) -> Schedule {
    Schedule::expression(format!("cron(0 {hour} * * ? *)"))
}

fn scheduled(name: &str, hour: &str, min: u32, max: u32) -> Call {
    Call::Scheduled {
        name: name.to_string(),
        schedule: format!("cron(0 {hour} * * ? *)"),
        min,
        max,
    }
}

fn metric(name: &str, metric: UtilizationMetric, pct: f64, scale_in: u64, scale_out: u64) -> Call {
    Call::Metric {
        name: name.to_string(),
        metric,
        target_pct: pct,
        scale_in_secs: scale_in,
        scale_out_secs: scale_out,
    }
}

fn run(strategy: &Strategy) -> Vec<Call> {
    let mut service = RecordingService::default();
    strategy.apply(&mut service).unwrap();
    service.calls
}

#[test]
fn fixed_capacity_registers_exact_bounds() {
    let strategy = fixed_capacity(FixedCapacityProps {
        fixed_capacity: Some(10),
    });
    assert_eq!(run(&strategy), vec![Call::Register(10, 10)]);
}

#[test]
fn fixed_capacity_defaults_to_one() {
    let strategy = fixed_capacity(FixedCapacityProps::default());
    assert_eq!(run(&strategy), vec![Call::Register(1, 1)]);
}

#[test]
fn scheduled_scaling_prod_example() {
    let strategy = scheduled_scaling(ScheduledScalingProps {
        scale_out_min_capacity: Some(50),
        scale_out_max_capacity: Some(200),
        scale_in_min_capacity: Some(10),
        scale_in_max_capacity: Some(200),
        cpu_utilization_pct: Some(50.0),
        memory_utilization_pct: Some(50.0),
        ..ScheduledScalingProps::new(cron("10"), cron("14"))
    });

    assert_eq!(
        run(&strategy),
        vec![
            Call::Register(10, 200),
            scheduled("scale-out", "10", 50, 200),
            scheduled("scale-in", "14", 10, 200),
            metric("CpuScaling", UtilizationMetric::Cpu, 50.0, 120, 30),
            metric("MemoryScaling", UtilizationMetric::Memory, 50.0, 120, 30),
        ]
    );
}

#[test]
fn scheduled_scaling_uses_default_table() {
    let strategy = scheduled_scaling(ScheduledScalingProps::new(cron("8"), cron("20")));

    assert_eq!(
        run(&strategy),
        vec![
            Call::Register(1, 25),
            scheduled("scale-out", "8", 1, 25),
            scheduled("scale-in", "20", 1, 25),
            metric("CpuScaling", UtilizationMetric::Cpu, 20.0, 120, 30),
            metric("MemoryScaling", UtilizationMetric::Memory, 50.0, 120, 30),
        ]
    );
}

#[test]
fn custom_cooldowns_reach_both_metric_rules() {
    let strategy = scheduled_scaling(ScheduledScalingProps {
        scale_in_cooldown: Some(Duration::from_secs(600)),
        scale_out_cooldown: Some(Duration::from_secs(5)),
        ..ScheduledScalingProps::new(cron("8"), cron("20"))
    });

    let calls = run(&strategy);
    assert_eq!(calls[3], metric("CpuScaling", UtilizationMetric::Cpu, 20.0, 600, 5));
    assert_eq!(calls[4], metric("MemoryScaling", UtilizationMetric::Memory, 50.0, 600, 5));
}

#[test]
fn same_strategy_on_two_services_is_identical() {
    let strategy = scheduled_scaling(ScheduledScalingProps::new(cron("6"), cron("22")));
    let first = run(&strategy);
    let second = run(&strategy);
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn no_strategy_makes_no_calls() {
    let mut service = RecordingService::default();
    apply_strategy(None, ValidationPolicy::Strict, &mut service).unwrap();
    assert!(service.calls.is_empty());
}

#[test]
fn strict_policy_fails_before_touching_the_service() {
    let strategy = scheduled_scaling(ScheduledScalingProps {
        scale_out_min_capacity: Some(100),
        scale_out_max_capacity: Some(10),
        ..ScheduledScalingProps::new(cron("10"), cron("14"))
    });

    let mut service = RecordingService::default();
    let err = apply_strategy(Some(&strategy), ValidationPolicy::Strict, &mut service).unwrap_err();

    assert!(matches!(err, ApplyError::Config(_)));
    assert!(service.calls.is_empty());
}

#[test]
fn passthrough_policy_forwards_values() {
    let strategy = scheduled_scaling(ScheduledScalingProps {
        scale_out_min_capacity: Some(100),
        scale_out_max_capacity: Some(10),
        ..ScheduledScalingProps::new(Schedule::expression("whenever"), cron("14"))
    });

    let mut service = RecordingService::default();
    apply_strategy(Some(&strategy), ValidationPolicy::Passthrough, &mut service).unwrap();

    assert_eq!(service.calls.len(), 5);
    assert_eq!(
        service.calls[1],
        Call::Scheduled {
            name: "scale-out".into(),
            schedule: "whenever".into(),
            min: 100,
            max: 10,
        }
    );
}

#[test]
fn handle_fault_propagates_and_stops() {
    let strategy = scheduled_scaling(ScheduledScalingProps::new(cron("10"), cron("14")));

    let mut service = RecordingService {
        fail_on_rule: Some("scale-in".into()),
        ..Default::default()
    };
    let err = apply_strategy(Some(&strategy), ValidationPolicy::Strict, &mut service).unwrap_err();

    assert_eq!(err, ApplyError::Handle(HandleError::DuplicateRule("scale-in".into())));
    // Already-attached rules are not rolled back; later ones are never attached.
    assert_eq!(
        service.calls,
        vec![Call::Register(1, 25), scheduled("scale-out", "10", 1, 25)]
    );
}
