//! Access-log line parser: structural match first, then field validation in a
//! fixed order, stopping at the first field that fails.

use super::regex_error::RegexError;
use super::regex_patterns;
use super::validators::{self, ValidationError};
use crate::domain::{FailureReason, ParsedRecord};
use regex::{Captures, Regex};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("Line does not match the access log pattern")]
    NoMatch,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Unexpected parse failure: {0}")]
    Unexpected(String),
}

impl LineError {
    pub fn reason(&self) -> FailureReason {
        match self {
            LineError::NoMatch => FailureReason::RegexNoMatch,
            LineError::Invalid(e) => e.reason(),
            LineError::Unexpected(_) => FailureReason::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: &'static Regex,
}

impl LineParser {
    pub fn new() -> Result<Self, RegexError> {
        Ok(Self {
            pattern: regex_patterns::access_log()?,
        })
    }

    /// Validation order: timestamp, IP, status, request. Size never rejects a line.
    pub fn parse(&self, line: &str) -> Result<ParsedRecord, LineError> {
        let captures = self.pattern.captures(line).ok_or(LineError::NoMatch)?;

        let minute = validators::parse_minute(field(&captures, "timestamp")?)?;
        let ip = validators::parse_ip(field(&captures, "ip")?)?;
        let (status, status_group) = validators::parse_status(field(&captures, "status")?)?;
        let (method, path) = validators::parse_request(field(&captures, "request")?)?;
        let size = captures
            .name("size")
            .and_then(|m| validators::parse_size(m.as_str()));

        Ok(ParsedRecord {
            ip: ip.to_string(),
            minute,
            status: status.to_string(),
            status_group,
            method,
            path: path.to_string(),
            size,
        })
    }
}

fn field<'a>(captures: &Captures<'a>, name: &str) -> Result<&'a str, LineError> {
    captures
        .name(name)
        .map(|m| m.as_str())
        .ok_or_else(|| LineError::Unexpected(format!("missing field: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HttpMethod;

    fn parser() -> LineParser {
        LineParser::new().unwrap()
    }

    #[test]
    fn test_parse_canonical_line() {
        let record = parser()
            .parse(r#"192.168.1.5 - - [10/Oct/2023:12:00:00 +0300] "GET /index.html HTTP/1.1" 200 1234"#)
            .unwrap();

        assert_eq!(record.ip, "192.168.1.5");
        assert_eq!(record.minute, "2023-10-10 12:00");
        assert_eq!(record.status, "200");
        assert_eq!(record.status_group, "2xx");
        assert_eq!(record.method, HttpMethod::Get);
        assert_eq!(record.path, "/index.html");
        assert_eq!(record.size, Some(1234));
    }

    #[test]
    fn test_dash_size_is_absent_not_an_error() {
        let record = parser()
            .parse(r#"::1 - - [10/Oct/2023:12:00:00 +0000] "HEAD / HTTP/1.0" 304 -"#)
            .unwrap();
        assert_eq!(record.size, None);
        assert_eq!(record.status_group, "3xx");
    }

    #[test]
    fn test_trailing_combined_fields_are_ignored() {
        let record = parser()
            .parse(r#"10.0.0.1 - bob [25/Dec/2023:10:15:30 +0000] "POST /api HTTP/1.1" 201 10 "-" "curl/8.0""#)
            .unwrap();
        assert_eq!(record.method, HttpMethod::Post);
        assert_eq!(record.size, Some(10));
    }

    #[test]
    fn test_failure_classification() {
        let p = parser();
        let cases = [
            ("not a log line", FailureReason::RegexNoMatch),
            (
                r#"1.2.3.4 - - [bad time] "GET / HTTP/1.1" 200 1"#,
                FailureReason::TimestampError,
            ),
            (
                r#"999.2.3.4 - - [10/Oct/2023:12:00:00 +0000] "GET / HTTP/1.1" 200 1"#,
                FailureReason::IpError,
            ),
            (
                r#"1.2.3.4 - - [10/Oct/2023:12:00:00 +0000] "GET / HTTP/1.1" 999 1"#,
                FailureReason::StatusError,
            ),
            (
                r#"1.2.3.4 - - [10/Oct/2023:12:00:00 +0000] "BREW /pot HTTP/1.1" 200 1"#,
                FailureReason::RequestError,
            ),
        ];

        for (line, expected) in cases {
            assert_eq!(p.parse(line).unwrap_err().reason(), expected, "{line}");
        }
    }

    #[test]
    fn test_first_failing_field_wins() {
        // Bad timestamp, bad IP, bad status and bad request at once.
        let err = parser()
            .parse(r#"nope - - [never] "BREW" 999 -"#)
            .unwrap_err();
        assert_eq!(err.reason(), FailureReason::TimestampError);

        // Bad IP and bad status: IP is checked first.
        let err = parser()
            .parse(r#"nope - - [10/Oct/2023:12:00:00 +0000] "GET / HTTP/1.1" 999 -"#)
            .unwrap_err();
        assert_eq!(err.reason(), FailureReason::IpError);
    }
}
