//! Core trait for liveness probing

use async_trait::async_trait;

use super::{CancelToken, HealthError, ProbeOutcome};

/// Trait for liveness probe implementations
///
/// A probe runs once, observes `cancel` cooperatively, and yields exactly
/// one [`ProbeOutcome`]. Errors are reserved for failures that prevent the
/// probe from reaching any outcome, such as an unresolvable host.
#[async_trait]
pub trait Probe {
    /// Execute the probe
    async fn probe(&self, cancel: &CancelToken) -> Result<ProbeOutcome, HealthError>;
}
