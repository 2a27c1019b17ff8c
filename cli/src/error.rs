//! CLI error types

use ppd_core::health::HealthError;
use ppd_core::CoreError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("{0}")]
    Probe(#[from] HealthError),
}

impl CliError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CliError::InvalidArgument(_) => "CLI002",
            CliError::Core(e) => e.code(),
            CliError::Probe(e) => e.code(),
        }
    }
}

/// CLI-specific result type
pub type Result<T> = std::result::Result<T, CliError>;
