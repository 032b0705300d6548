//! Per-field validators. Each takes the raw captured text and returns the
//! normalized value or a [`ValidationError`] naming the failed field.

use crate::domain::{FailureReason, HttpMethod};
use chrono::DateTime;
use std::net::IpAddr;
use thiserror::Error;

pub const TIMESTAMP_INPUT_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const MIN_STATUS_CODE: u16 = 100;
pub const MAX_STATUS_CODE: u16 = 599;
const STATUS_CODE_LENGTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid timestamp '{value}': {details}")]
    Timestamp { value: String, details: String },

    #[error("Invalid IP format: {value}")]
    Ip { value: String },

    #[error("Invalid status code format: {value}")]
    StatusFormat { value: String },

    #[error("Status code out of range: {value} (valid: {MIN_STATUS_CODE}-{MAX_STATUS_CODE})")]
    StatusRange { value: String },

    #[error("Malformed request '{value}': {details}")]
    Request { value: String, details: String },
}

impl ValidationError {
    pub fn reason(&self) -> FailureReason {
        match self {
            ValidationError::Timestamp { .. } => FailureReason::TimestampError,
            ValidationError::Ip { .. } => FailureReason::IpError,
            ValidationError::StatusFormat { .. } | ValidationError::StatusRange { .. } => {
                FailureReason::StatusError
            }
            ValidationError::Request { .. } => FailureReason::RequestError,
        }
    }
}

/// Truncates an access-log timestamp to its minute bucket.
pub fn parse_minute(timestamp: &str) -> Result<String, ValidationError> {
    DateTime::parse_from_str(timestamp, TIMESTAMP_INPUT_FORMAT)
        .map(|dt| dt.format(TIMESTAMP_OUTPUT_FORMAT).to_string())
        .map_err(|e| ValidationError::Timestamp {
            value: timestamp.to_string(),
            details: e.to_string(),
        })
}

pub fn parse_ip(ip: &str) -> Result<&str, ValidationError> {
    ip.parse::<IpAddr>()
        .map(|_| ip)
        .map_err(|_| ValidationError::Ip {
            value: ip.to_string(),
        })
}

/// Returns the status code text and its class (`"2xx"`, ..., or `"Unknown"`).
pub fn parse_status(status: &str) -> Result<(&str, String), ValidationError> {
    let code: u16 = status.parse().map_err(|_| ValidationError::StatusFormat {
        value: status.to_string(),
    })?;

    if !(MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&code) {
        return Err(ValidationError::StatusRange {
            value: status.to_string(),
        });
    }

    Ok((status, status_group(status)))
}

pub fn status_group(status: &str) -> String {
    match status.chars().next() {
        Some(first) if status.chars().count() == STATUS_CODE_LENGTH => format!("{first}xx"),
        _ => "Unknown".to_string(),
    }
}

/// Splits `METHOD PATH PROTOCOL` and checks each part.
pub fn parse_request(request: &str) -> Result<(HttpMethod, &str), ValidationError> {
    let invalid = |details: String| ValidationError::Request {
        value: request.to_string(),
        details,
    };

    if request.is_empty() {
        return Err(invalid("empty request".to_string()));
    }

    let parts: Vec<&str> = request.split_whitespace().collect();
    let &[method, path, protocol] = parts.as_slice() else {
        return Err(invalid(format!(
            "expected 3 parts, found {}",
            parts.len()
        )));
    };

    let method = method.parse::<HttpMethod>().map_err(invalid)?;

    if !path.starts_with('/') {
        return Err(invalid("invalid path: must start with /".to_string()));
    }

    if !protocol.starts_with("HTTP/") {
        return Err(invalid("invalid protocol: must start with HTTP/".to_string()));
    }

    Ok((method, path))
}

/// Digits-only sizes become a number; `-` or anything else is simply absent.
/// Sizes past `u64::MAX` saturate so the request still counts toward size stats.
pub fn parse_size(size: &str) -> Option<u64> {
    if !size.is_empty() && size.bytes().all(|b| b.is_ascii_digit()) {
        // All digits, so overflow is the only way parsing can fail.
        Some(size.parse().unwrap_or(u64::MAX))
    } else {
        None
    }
}
