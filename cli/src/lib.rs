//! PPD instance check plugin
//!
//! Turns command-line options into a [`ProbeConfig`], runs the probe, and maps
//! its [`ProbeOutcome`] to a monitoring-plugin [`CheckResult`].

pub mod error;
pub mod version;

pub use error::{CliError, Result};
pub use version::PpdVersion;

use clap::Parser;
use ppd_core::config::{load_probe_config_from_toml_path, ProbeConfig};
use ppd_core::{CancelToken, CheckResult, NagiosState, Probe, ProbeOutcome};
use std::path::PathBuf;
use tracing::debug;

/// Name printed at the start of the status line
pub const CHECK_NAME: &str = "PPD_INSTANCE";

/// Checks a running instance of a PPD (provisioning daemon)
#[derive(Debug, Parser)]
#[command(name = "check_ppd_instance")]
#[command(about = "Checks a running instance of a PPD (provisioning daemon)")]
#[command(version)]
pub struct Args {
    /// The DNS name or IP address of the host running the PPD
    #[arg(short = 'H', long = "host-address", visible_alias = "host", value_name = "ADDRESS")]
    pub host_address: Option<String>,

    /// The TCP port of the PPD on the host to check [default: 8073]
    #[arg(short = 'P', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// The job id to use in the PJD sent to the PPD [default: 1]
    #[arg(short = 'J', long, value_name = "ID")]
    pub job_id: Option<u64>,

    /// Seconds before the check times out [default: 30]
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Longest wait for the socket to become readable [default: 0.05]
    #[arg(long, value_name = "SECS")]
    pub polling_interval: Option<f64>,

    /// Bytes read from the socket at once, at least 512 [default: 8192]
    #[arg(long, value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Bound on each connection attempt [default: 5]
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<f64>,

    /// Minimum PPD version; an older PPD gives a warning
    #[arg(long, value_name = "VERSION")]
    pub min_version: Option<PpdVersion>,

    /// TOML file with probe settings; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (may be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Build a validated probe configuration from the file (if any) and flags
    pub fn probe_config(&self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => load_probe_config_from_toml_path(path)?,
            None => ProbeConfig::default(),
        };

        if let Some(host) = &self.host_address {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(job_id) = self.job_id {
            config.job_id = job_id;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(interval) = self.polling_interval {
            config.polling_interval = interval;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        if let Some(connect_timeout) = self.connect_timeout {
            config.connect_timeout = connect_timeout;
        }

        config.validate()?;
        debug!("Effective probe configuration: {:?}", config);
        Ok(config)
    }
}

/// Map a probe outcome to a check result
pub fn evaluate(
    config: &ProbeConfig,
    outcome: &ProbeOutcome,
    min_version: Option<&PpdVersion>,
) -> CheckResult {
    match outcome {
        ProbeOutcome::Success(payload) => {
            if let Some(min) = min_version {
                match PpdVersion::find_in(payload) {
                    Some(found) if found < *min => {
                        return CheckResult::new(
                            NagiosState::Warning,
                            format!("PPD version {} is lower than required {}.", found, min),
                        );
                    }
                    Some(_) => {}
                    None => {
                        return CheckResult::new(
                            NagiosState::Warning,
                            "Could not determine PPD version from response.",
                        );
                    }
                }
            }
            CheckResult::new(
                NagiosState::Ok,
                format!(
                    "PPD on '{}' port {} seems to be okay.",
                    config.host, config.port
                ),
            )
        }
        ProbeOutcome::NoListener { .. } | ProbeOutcome::TimedOut(_) => {
            CheckResult::new(NagiosState::Critical, outcome.to_string())
        }
        ProbeOutcome::TransportError(message) => {
            CheckResult::new(NagiosState::Critical, format!("Transport error: {}", message))
        }
        ProbeOutcome::Cancelled => {
            CheckResult::new(NagiosState::Unknown, "Check cancelled by signal.")
        }
    }
}

/// Map an error that kept the check from producing an outcome
pub fn unknown(error: &CliError) -> CheckResult {
    CheckResult::new(NagiosState::Unknown, error.to_string())
}

/// Run `probe` once and evaluate the result
pub async fn run_check<P: Probe + ?Sized + Sync>(
    probe: &P,
    config: &ProbeConfig,
    min_version: Option<&PpdVersion>,
    cancel: &CancelToken,
) -> CheckResult {
    match probe.probe(cancel).await {
        Ok(outcome) => evaluate(config, &outcome, min_version),
        Err(e) => unknown(&CliError::from(e)),
    }
}
