//! PJD request envelope
//!
//! The PPD accepts a small XML document naming a job id and a command. The
//! layout below is matched byte for byte by deployed daemons, including the
//! four-space indentation and the trailing newline. Nothing is escaped, so
//! commands are restricted to plain tokens.

use crate::{CoreError, Result};

/// Command token asking the PPD to describe itself
pub const INFO_COMMAND: &str = "info";

/// An immutable request to the PPD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PjdRequest {
    job_id: u64,
    command: String,
}

impl PjdRequest {
    /// Build a request for `command` under `job_id`
    ///
    /// `command` must be a non-empty token of ASCII letters, digits, `-` or `_`.
    pub fn new(job_id: u64, command: impl Into<String>) -> Result<Self> {
        let command = command.into();
        if !is_command_token(&command) {
            return Err(CoreError::ValidationError(format!(
                "command: {:?} is not a plain token",
                command
            )));
        }
        Ok(Self { job_id, command })
    }

    /// Build the `info` request used by the liveness check
    pub fn info(job_id: u64) -> Self {
        Self {
            job_id,
            command: INFO_COMMAND.to_string(),
        }
    }

    /// Job id carried in the envelope
    #[must_use]
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Command token carried in the envelope
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Serialize to the wire payload
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <pjd>\n    \
             <job-id>{}</job-id>\n    \
             <command>{}</command>\n\
             </pjd>\n",
            self.job_id, self.command
        )
        .into_bytes()
    }
}

fn is_command_token(command: &str) -> bool {
    !command.is_empty()
        && command
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_payload_is_exact() {
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<pjd>\n\
\x20   <job-id>1</job-id>\n\
\x20   <command>info</command>\n\
</pjd>\n";
        assert_eq!(PjdRequest::info(1).encode(), expected.as_bytes());
    }

    #[test]
    fn test_job_id_is_rendered_in_decimal() {
        let payload = String::from_utf8(PjdRequest::info(4711).encode()).unwrap();
        assert!(payload.contains("    <job-id>4711</job-id>\n"));
        assert!(payload.ends_with("</pjd>\n"));
    }

    #[test]
    fn test_accessors() {
        let req = PjdRequest::new(7, "status").unwrap();
        assert_eq!(req.job_id(), 7);
        assert_eq!(req.command(), "status");
        assert_eq!(PjdRequest::new(1, INFO_COMMAND).unwrap(), PjdRequest::info(1));
    }

    #[test]
    fn test_markup_in_command_is_rejected() {
        for bad in ["", "info</command><x>", "a&b", "a>b", "two words", "line\n"] {
            let err = PjdRequest::new(1, bad).unwrap_err();
            assert_eq!(err.code(), "CORE002", "{bad:?}");
        }
    }
}
