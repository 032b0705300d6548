use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a single line was rejected. Serialized in snake_case for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    RegexNoMatch,
    TimestampError,
    IpError,
    StatusError,
    RequestError,
    UnexpectedError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::RegexNoMatch => "regex_no_match",
            FailureReason::TimestampError => "timestamp_error",
            FailureReason::IpError => "ip_error",
            FailureReason::StatusError => "status_error",
            FailureReason::RequestError => "request_error",
            FailureReason::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
