//! Applying an optional strategy to a service handle.

use thiserror::Error;
use tide_core::ConfigError;
use tracing::{debug, info};

use crate::handle::{HandleError, ScalableService};
use crate::strategy::Strategy;
use crate::validate::ValidationPolicy;

pub type ApplyResult<T> = Result<T, ApplyError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("invalid scaling configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// Apply `strategy` to `service`, once.
///
/// With no strategy the service is left untouched. Configuration checks
/// run under `policy` before the first handle call. Handle faults are
/// returned as-is without retry; whatever was registered before the fault
/// stays registered.
pub fn apply_strategy(
    strategy: Option<&Strategy>,
    policy: ValidationPolicy,
    service: &mut dyn ScalableService,
) -> ApplyResult<()> {
    let Some(strategy) = strategy else {
        debug!("no scaling strategy; service keeps its static task count");
        return Ok(());
    };

    policy.check(strategy)?;
    strategy.apply(service)?;

    info!(strategy = strategy.kind(), %policy, "scaling strategy applied");
    Ok(())
}
