//! Sequential connection attempts over resolved candidates

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use super::resolver::{Candidates, Endpoint};
use super::HealthError;

/// Connect to the first candidate that accepts, in resolver order
///
/// Each attempt is bounded by `attempt_timeout`. A socket from a failed
/// attempt is dropped, and therefore closed, before the next candidate is
/// tried. Attempts never overlap.
pub async fn connect(
    candidates: &Candidates,
    attempt_timeout: Duration,
) -> Result<(TcpStream, Endpoint), HealthError> {
    for endpoint in candidates {
        debug!("Trying {:?} candidate {}", endpoint.family, endpoint.addr);

        match timeout(attempt_timeout, TcpStream::connect(endpoint.addr)).await {
            Ok(Ok(stream)) => {
                info!("Connected to PPD at {}", endpoint.addr);
                return Ok((stream, *endpoint));
            }
            Ok(Err(io_error)) => {
                debug!("Connect to {} failed: {}", endpoint.addr, io_error);
            }
            Err(_elapsed) => {
                debug!(
                    "Connect to {} timed out after {:?}",
                    endpoint.addr, attempt_timeout
                );
            }
        }
    }

    Err(HealthError::NoListener {
        host: candidates.host().to_string(),
        port: candidates.port(),
    })
}
