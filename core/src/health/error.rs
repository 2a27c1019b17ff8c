//! Error types for PPD probing

use thiserror::Error;

/// Probe failures that are not part of a terminal [`ProbeOutcome`]
///
/// [`ProbeOutcome`]: super::ProbeOutcome
#[derive(Error, Debug)]
pub enum HealthError {
    /// The host name could not be resolved to any address
    #[error("cannot resolve '{host}', port {port}: {source}")]
    Resolution {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Every resolved candidate refused or failed to connect
    #[error("PPD seems not to listen on '{host}', port {port}.")]
    NoListener { host: String, port: u16 },
}

impl HealthError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            HealthError::Resolution { .. } => "PROBE001",
            HealthError::NoListener { .. } => "PROBE002",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_listener_display() {
        let err = HealthError::NoListener {
            host: "127.0.0.1".to_string(),
            port: 9999,
        };
        assert_eq!(err.to_string(), "PPD seems not to listen on '127.0.0.1', port 9999.");
        assert_eq!(err.code(), "PROBE002");
    }

    #[test]
    fn test_resolution_keeps_source() {
        use std::error::Error as _;

        let err = HealthError::Resolution {
            host: "nowhere.invalid".to_string(),
            port: 8073,
            source: std::io::Error::other("no such host"),
        };
        assert_eq!(err.code(), "PROBE001");
        assert!(err.source().is_some());
        assert!(err.to_string().contains("nowhere.invalid"));
    }
}
