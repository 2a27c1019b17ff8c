//! Terminal probe outcomes and the exchange that produces them

use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use super::receiver::{receive, Connection, ConnectionGuard, ReceiveLimits, Terminal};
use super::{CancelToken, HealthError};

/// Result of one probe invocation, produced exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The peer replied and closed; the payload is passed through unmodified
    Success(Vec<u8>),
    /// No resolved candidate accepted a connection
    NoListener { host: String, port: u16 },
    /// The total timeout elapsed before the reply was complete
    TimedOut(Duration),
    /// Cancellation was requested while waiting
    Cancelled,
    /// Any other socket-level failure
    TransportError(String),
}

impl ProbeOutcome {
    /// Whether the probe received a complete reply
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }

    /// The reply bytes, when successful
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            ProbeOutcome::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// Map a probe error to an outcome where one exists
    ///
    /// `NoListener` is an outcome; resolution failures stay errors.
    pub fn from_error(error: HealthError) -> Result<Self, HealthError> {
        match error {
            HealthError::NoListener { host, port } => Ok(ProbeOutcome::NoListener { host, port }),
            other => Err(other),
        }
    }
}

impl From<Terminal> for ProbeOutcome {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Done(payload) => ProbeOutcome::Success(payload),
            Terminal::TimedOut(elapsed) => ProbeOutcome::TimedOut(elapsed),
            Terminal::Cancelled => ProbeOutcome::Cancelled,
            Terminal::Error(e) => ProbeOutcome::TransportError(e.to_string()),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success(payload) => write!(f, "received {} bytes", payload.len()),
            ProbeOutcome::NoListener { host, port } => {
                write!(f, "PPD seems not to listen on '{}', port {}.", host, port)
            }
            ProbeOutcome::TimedOut(elapsed) => {
                write!(f, "Timeout after {:.2} seconds.", elapsed.as_secs_f64())
            }
            ProbeOutcome::Cancelled => write!(f, "cancelled"),
            ProbeOutcome::TransportError(message) => write!(f, "transport error: {}", message),
        }
    }
}

/// Run one bounded exchange on `conn` and report its outcome
///
/// The connection is closed exactly once before this returns, whichever
/// terminal state was reached.
pub async fn exchange<C: Connection>(
    conn: C,
    request: &[u8],
    limits: &ReceiveLimits,
    cancel: &CancelToken,
) -> ProbeOutcome {
    let mut guard = ConnectionGuard::new(conn);
    let terminal = receive(guard.get_mut(), request, limits, cancel).await;
    drop(guard);

    let outcome = ProbeOutcome::from(terminal);
    match &outcome {
        ProbeOutcome::Success(payload) => info!("PPD replied with {} bytes", payload.len()),
        ProbeOutcome::Cancelled => info!("Probe cancelled"),
        other => warn!("Probe failed: {}", other),
    }
    outcome
}
