use crate::app::config::ConfigError;
use crate::parser::regex_error::RegexError;
use std::path::PathBuf;
use thiserror::Error;

/// Run-level failure. Any of these aborts the analysis and no report is produced.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Cannot find the file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error in {} after line {line}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Access log pattern unavailable: {0}")]
    Pattern(#[from] RegexError),

    #[error("Invalid analyzer configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Short machine-readable kind, mirrored into the `error` field of failed runs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::FileNotFound { .. } => "FileNotFoundError",
            AnalysisError::FileOpen { .. } => "FileOpenError",
            AnalysisError::Read { .. } => "ReadError",
            AnalysisError::Pattern(_) => "PatternError",
            AnalysisError::Config(_) => "ConfigError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = AnalysisError::FileNotFound {
            path: PathBuf::from("/nope.log"),
        };
        assert_eq!(err.kind(), "FileNotFoundError");
        assert!(err.to_string().contains("/nope.log"));

        let err = AnalysisError::Read {
            path: PathBuf::from("a.log"),
            line: 7,
            source: std::io::Error::other("disk gone"),
        };
        assert_eq!(err.kind(), "ReadError");
        assert!(err.to_string().contains("line 7"));
    }
}
