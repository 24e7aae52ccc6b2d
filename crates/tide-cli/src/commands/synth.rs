use std::path::Path;

use tide_autoscale::ValidationPolicy;
use tide_stack::TideConfig;
use tracing::info;

pub fn synth(
    config: &str,
    out: &str,
    stack: Option<&str>,
    validation: Option<ValidationPolicy>,
) -> anyhow::Result<()> {
    let cfg = TideConfig::from_file(Path::new(config))?;
    let app = cfg.into_app(validation)?;
    info!(stacks = app.len(), out, "synthesizing");
    let written = app.synth(Path::new(out), stack)?;

    info!(templates = written.len(), "synth complete");
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}
