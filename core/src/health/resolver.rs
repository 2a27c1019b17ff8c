//! Host name resolution into connection candidates

use std::net::SocketAddr;
use tokio::net::lookup_host;
use tracing::debug;

use super::HealthError;

/// Address family of a candidate endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// IPv4
    Inet,
    /// IPv6
    Inet6,
}

/// One resolved socket address eligible for a connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Address family of `addr`
    pub family: AddressFamily,
    /// Socket address to connect to
    pub addr: SocketAddr,
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        let family = match addr {
            SocketAddr::V4(_) => AddressFamily::Inet,
            SocketAddr::V6(_) => AddressFamily::Inet6,
        };
        Self { family, addr }
    }
}

/// Ordered candidates for one `host:port`, in the system resolver's order
///
/// Iterating borrows the list, so the sequence can be walked again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    host: String,
    port: u16,
    endpoints: Vec<Endpoint>,
}

impl Candidates {
    /// Build candidates from already-known addresses
    pub fn new(host: impl Into<String>, port: u16, endpoints: Vec<Endpoint>) -> Self {
        Self {
            host: host.into(),
            port,
            endpoints,
        }
    }

    /// Host the candidates were resolved from
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port shared by all candidates
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether there are no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Walk the candidates in resolver order
    pub fn iter(&self) -> std::slice::Iter<'_, Endpoint> {
        self.endpoints.iter()
    }
}

impl<'a> IntoIterator for &'a Candidates {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolve `host` and `port` into stream-socket candidates of every family
///
/// IP literals resolve without touching the network. Resolution failures are
/// returned as [`HealthError::Resolution`] and are not retried.
pub async fn resolve(host: &str, port: u16) -> Result<Candidates, HealthError> {
    let resolution_error = |source: std::io::Error| HealthError::Resolution {
        host: host.to_string(),
        port,
        source,
    };

    let endpoints: Vec<Endpoint> = lookup_host((host, port))
        .await
        .map_err(resolution_error)?
        .map(Endpoint::from)
        .collect();

    if endpoints.is_empty() {
        return Err(resolution_error(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no addresses returned",
        )));
    }

    debug!("Resolved {}:{} to {} candidate(s)", host, port, endpoints.len());
    Ok(Candidates::new(host, port, endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let candidates = resolve("127.0.0.1", 9999).await.unwrap();
        assert_eq!(candidates.len(), 1);
        let first = candidates.iter().next().unwrap();
        assert_eq!(first.family, AddressFamily::Inet);
        assert_eq!(first.addr, "127.0.0.1:9999".parse().unwrap());
        assert_eq!(candidates.host(), "127.0.0.1");
        assert_eq!(candidates.port(), 9999);
    }

    #[tokio::test]
    async fn test_resolve_ipv6_literal() {
        let candidates = resolve("::1", 8073).await.unwrap();
        let first = candidates.iter().next().unwrap();
        assert_eq!(first.family, AddressFamily::Inet6);
    }

    #[tokio::test]
    async fn test_resolve_failure() {
        let err = resolve("host.invalid", 8073).await.unwrap_err();
        assert!(matches!(err, HealthError::Resolution { port: 8073, .. }), "{err:?}");
    }

    #[test]
    fn test_candidates_are_restartable() {
        let candidates = Candidates::new(
            "dual",
            1,
            vec![
                Endpoint::from("127.0.0.1:1".parse::<SocketAddr>().unwrap()),
                Endpoint::from("[::1]:1".parse::<SocketAddr>().unwrap()),
            ],
        );
        let first: Vec<_> = candidates.iter().map(|e| e.family).collect();
        let second: Vec<_> = (&candidates).into_iter().map(|e| e.family).collect();
        assert_eq!(first, vec![AddressFamily::Inet, AddressFamily::Inet6]);
        assert_eq!(first, second);
    }
}
