//! Probe configuration loading and validation
//!
//! A [`ProbeConfig`] can be built in code, deserialized from TOML, or both: the
//! check plugin loads an optional file and then overlays command-line values.
//! Loading does not validate, because the host is commonly supplied only on the
//! command line; call [`ProbeConfig::validate`] once all overrides are applied.

use crate::{CoreError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default TCP port of the PPD
pub const DEFAULT_PPD_PORT: u16 = 8073;
/// Default total time budget for one probe, in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
/// Default maximum wait for readability before re-checking deadline and cancellation
pub const DEFAULT_POLLING_INTERVAL_SECS: f64 = 0.05;
/// Default size of a single socket read
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
/// Smallest accepted read buffer
pub const MIN_BUFFER_SIZE: usize = 512;
/// Default job id sent in the request envelope
pub const DEFAULT_JOB_ID: u64 = 1;
/// Default bound on a single connect attempt, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: f64 = 5.0;

/// Settings for one probe invocation
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProbeConfig {
    /// DNS name or IP address of the host running the PPD
    #[serde(default)]
    pub host: String,
    /// TCP port of the PPD
    #[serde(default = "default_port")]
    pub port: u16,
    /// Total time budget in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// Readiness wait slice in seconds
    #[serde(default = "default_polling_interval")]
    pub polling_interval: f64,
    /// Bytes requested per read
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Job id placed in the request envelope
    #[serde(default = "default_job_id")]
    pub job_id: u64,
    /// Bound on each per-candidate connect attempt, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: f64,
}

fn default_port() -> u16 {
    DEFAULT_PPD_PORT
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_polling_interval() -> f64 {
    DEFAULT_POLLING_INTERVAL_SECS
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_job_id() -> u64 {
    DEFAULT_JOB_ID
}

fn default_connect_timeout() -> f64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PPD_PORT,
            timeout: DEFAULT_TIMEOUT_SECS,
            polling_interval: DEFAULT_POLLING_INTERVAL_SECS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            job_id: DEFAULT_JOB_ID,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    /// Create a configuration for `host:port` with all other values defaulted
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Validate the configuration, returning field-specific errors
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "host: cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(CoreError::ValidationError(
                "port: must be 1..=65535".to_string(),
            ));
        }
        check_seconds("timeout", self.timeout)?;
        check_seconds("pollingInterval", self.polling_interval)?;
        check_seconds("connectTimeout", self.connect_timeout)?;
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(CoreError::ValidationError(format!(
                "bufferSize: must be at least {} bytes, got {}",
                MIN_BUFFER_SIZE, self.buffer_size
            )));
        }
        if self.polling_interval >= self.timeout {
            warn!(
                "polling interval {}s is not below the timeout {}s; the timeout dominates",
                self.polling_interval, self.timeout
            );
        }
        debug!("Probe configuration validated successfully");
        Ok(())
    }

    /// Total time budget
    ///
    /// # Panics
    ///
    /// Panics on a value [`validate`](Self::validate) would reject.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Readiness wait slice
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs_f64(self.polling_interval)
    }

    /// Per-attempt connect bound, never longer than the total timeout
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout.min(self.timeout))
    }

    /// Target as `host:port` for log messages
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Must convert to a non-zero Duration; the Duration getters rely on it.
fn check_seconds(field: &str, value: f64) -> Result<()> {
    match Duration::try_from_secs_f64(value) {
        Ok(d) if !d.is_zero() => Ok(()),
        _ => Err(CoreError::ValidationError(format!(
            "{}: must be a positive, representable number of seconds, got {}",
            field, value
        ))),
    }
}

/// Load a probe config from a TOML file path (not validated)
pub fn load_probe_config_from_toml_path(path: impl AsRef<Path>) -> Result<ProbeConfig> {
    let data = fs::read_to_string(&path).map_err(|e| {
        CoreError::ConfigurationError(format!("Failed to read config {:?}: {}", path.as_ref(), e))
    })?;
    load_probe_config_from_toml_str(&data)
}

/// Load a probe config from a TOML string (not validated)
pub fn load_probe_config_from_toml_str(input: &str) -> Result<ProbeConfig> {
    toml::from_str(input)
        .map_err(|e| CoreError::ConfigurationError(format!("TOML parse error: {}", e)))
}
