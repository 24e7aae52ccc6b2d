use std::path::Path;

use tide_stack::{StackConfig, TideConfig};

pub fn list(config: &str) -> anyhow::Result<()> {
    let cfg = TideConfig::from_file(Path::new(config))?;
    println!("validation: {}", cfg.validation.policy);
    for stack in &cfg.stacks {
        println!("{}", describe(stack));
    }
    Ok(())
}

fn describe(stack: &StackConfig) -> String {
    let strategy = match &stack.scaling {
        Some(scaling) => scaling.clone().into_strategy().to_string(),
        None => "no autoscaling".to_string(),
    };
    format!(
        "{:<24} {}/{} cpu={} mem={}MiB  {}",
        stack.id,
        stack.service.cluster,
        tide_stack::stack::SERVICE_ID,
        stack.service.cpu,
        stack.service.memory_mib,
        strategy
    )
}
