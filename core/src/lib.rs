//! Core functionality for the PPD check
//!
//! This crate contains the liveness probe for a remote provisioning daemon,
//! its configuration, and the monitoring-plugin result types shared by the
//! check binaries.

pub mod config;
pub mod error;
pub mod health;
pub mod nagios;

pub use config::ProbeConfig;
pub use error::{CoreError, Result};
pub use health::{CancelToken, PpdProbe, Probe, ProbeOutcome};
pub use nagios::{CheckResult, NagiosState};

/// Core utilities and helper functions
pub mod utils {
    use tracing::info;

    /// Initialize tracing for the application
    ///
    /// `RUST_LOG` wins over `level`. Output goes to stderr so a plugin's
    /// single stdout line is not interleaved with log records.
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| crate::CoreError::InitializationError(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }

    /// Map a `-v` count to a tracing level name
    #[must_use]
    pub fn verbosity_level(verbose: u8) -> &'static str {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
