//! PPD liveness probing
//!
//! This module checks that a remote provisioning daemon (PPD) is alive: it
//! resolves the target, connects to the first candidate that accepts, sends a
//! PJD `info` request and collects the full reply within a time budget.
//!
//! ## Types
//!
//! - [`PpdProbe`]: Runs the full resolve, connect, send, receive sequence
//! - [`Probe`]: The trait probes implement
//! - [`ProbeOutcome`]: Terminal result of one invocation
//! - [`CancelToken`]: Cooperative cancellation observed by the receive loop
//! - [`HealthError`]: Failures that prevent reaching any outcome
//!
//! ## Flow
//!
//! [`resolver::resolve`] -> [`connector::connect`] -> [`PjdRequest::encode`]
//! -> [`outcome::exchange`] (send + [`receiver::receive`] + close)

pub mod cancel;
pub mod connector;
pub mod error;
pub mod outcome;
pub mod pjd;
pub mod receiver;
pub mod resolver;
pub mod types;

pub use cancel::CancelToken;
pub use error::HealthError;
pub use outcome::ProbeOutcome;
pub use pjd::PjdRequest;
pub use receiver::{Connection, ReceiveLimits, TcpConnection};
pub use resolver::{AddressFamily, Candidates, Endpoint};
pub use types::Probe;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ProbeConfig;

/// Probe that sends a PJD `info` request to a PPD and waits for the reply
///
/// # Example
///
/// ```rust,no_run
/// use ppd_core::config::ProbeConfig;
/// use ppd_core::health::{CancelToken, PpdProbe, Probe};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ProbeConfig::new("127.0.0.1", 8073);
/// config.validate()?;
///
/// let outcome = PpdProbe::new(config).probe(&CancelToken::new()).await?;
/// println!("PPD probe finished: {}", outcome);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PpdProbe {
    config: ProbeConfig,
}

impl PpdProbe {
    /// Create a probe from a validated configuration
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Configuration this probe runs with
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    async fn run(&self, cancel: &CancelToken) -> Result<ProbeOutcome, HealthError> {
        let config = &self.config;
        debug!(
            "Sending message to {}, with a timeout of {} seconds",
            config.address(),
            config.timeout
        );

        let candidates = resolver::resolve(&config.host, config.port).await?;
        let (stream, endpoint) = connector::connect(&candidates, config.connect_timeout()).await?;
        debug!("Got a socket address of {}", endpoint.addr);

        let request = PjdRequest::info(config.job_id).encode();
        let limits = ReceiveLimits::from(config);
        let conn = TcpConnection::new(stream, endpoint.addr);

        Ok(outcome::exchange(conn, &request, &limits, cancel).await)
    }
}

#[async_trait]
impl Probe for PpdProbe {
    async fn probe(&self, cancel: &CancelToken) -> Result<ProbeOutcome, HealthError> {
        self.run(cancel).await.or_else(ProbeOutcome::from_error)
    }
}
