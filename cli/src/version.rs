//! Dotted numeric versions reported by the PPD

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::CliError;

/// A dotted numeric version such as `2.1` or `v0.10.3`
///
/// Missing trailing segments compare as zero, so `2.1 == 2.1.0`.
#[derive(Debug, Clone)]
pub struct PpdVersion {
    segments: Vec<u64>,
    text: String,
}

impl PpdVersion {
    /// Parse one token, accepting an optional leading `v`/`V`
    pub fn parse_token(token: &str) -> Option<Self> {
        let digits = token
            .strip_prefix('v')
            .or_else(|| token.strip_prefix('V'))
            .unwrap_or(token);
        if digits.is_empty() {
            return None;
        }
        let segments = digits
            .split('.')
            .map(|s| {
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    s.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<u64>>>()?;
        Some(Self {
            segments,
            text: digits.to_string(),
        })
    }

    /// Find the first version-looking token in a PPD reply
    ///
    /// Tokens are split on whitespace and XML angle brackets, so both
    /// `PJD-OK v2.1` and `<version>2.1</version>` are recognised. A bare
    /// integer such as an echoed job id needs a `v` prefix to count.
    pub fn find_in(reply: &[u8]) -> Option<Self> {
        let text = String::from_utf8_lossy(reply);
        text.split(|c: char| c.is_whitespace() || c == '<' || c == '>')
            .filter(|t| t.contains('.') || t.starts_with(['v', 'V']))
            .find_map(Self::parse_token)
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for PpdVersion {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s.trim())
            .ok_or_else(|| CliError::InvalidArgument(format!("not a version number: {:?}", s)))
    }
}

impl Ord for PpdVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PpdVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PpdVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PpdVersion {}

impl fmt::Display for PpdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PpdVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(v("2.1").to_string(), "2.1");
        assert_eq!(v("v0.2.2").to_string(), "0.2.2");
        assert!("".parse::<PpdVersion>().is_err());
        assert!("v".parse::<PpdVersion>().is_err());
        assert!("2..1".parse::<PpdVersion>().is_err());
        assert!("2.1-beta".parse::<PpdVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(v("2.1") < v("2.10"));
        assert!(v("2.9.9") < v("3"));
        assert_eq!(v("2.1"), v("2.1.0"));
        assert!(v("0.10") > v("0.9.12"));
    }

    #[test]
    fn test_find_in_reply() {
        assert_eq!(PpdVersion::find_in(b"PJD-OK v2.1\n"), Some(v("2.1")));
        assert_eq!(
            PpdVersion::find_in(b"<reply><version>0.4.7</version></reply>"),
            Some(v("0.4.7"))
        );
        assert_eq!(
            PpdVersion::find_in(b"<job-id>1</job-id><version>v3</version>"),
            Some(v("3"))
        );
        assert_eq!(PpdVersion::find_in(b"PJD-OK\n"), None);
    }
}
