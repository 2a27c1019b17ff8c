//! Monitoring-plugin result states and output line

use std::fmt;

/// Tri-state check result plus `Unknown` for internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NagiosState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl NagiosState {
    /// Process exit code for this state
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            NagiosState::Ok => 0,
            NagiosState::Warning => 1,
            NagiosState::Critical => 2,
            NagiosState::Unknown => 3,
        }
    }

    /// Upper-case name as printed in the status line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NagiosState::Ok => "OK",
            NagiosState::Warning => "WARNING",
            NagiosState::Critical => "CRITICAL",
            NagiosState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for NagiosState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final state and message of one check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub state: NagiosState,
    pub message: String,
}

impl CheckResult {
    pub fn new(state: NagiosState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    /// The single output line, e.g. `PPD_INSTANCE OK - all good`
    #[must_use]
    pub fn line(&self, check_name: &str) -> String {
        format!("{} {} - {}", check_name, self.state, self.message)
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }
}
