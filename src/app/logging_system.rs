use super::config::{LogFormat, LogLevel};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Invalid log filter '{input}'")]
    InvalidFilter {
        input: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Logging system initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Builds the filter: `RUST_LOG` when set and valid, otherwise `level`.
pub fn build_filter(level: LogLevel) -> Result<EnvFilter, InitializationError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level.as_str()).map_err(|e| InitializationError::InvalidFilter {
        input: level.as_str().to_string(),
        source: Box::new(e),
    })
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout stays
/// free for user-facing output. Fails if a subscriber is already installed.
pub fn setup_logging(level: LogLevel, format: LogFormat) -> Result<(), InitializationError> {
    let filter = build_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| InitializationError::LoggingInitFailed {
        details: "Failed to set global tracing subscriber".to_string(),
        source: Box::new(e),
    })
}
