pub mod serde_helpers;
mod validation;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_helpers::load_env_var;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Output format for diagnostics on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line records (default)
    #[default]
    Compact,
    /// One JSON object per record
    Json,
}

/// Counting strategy requested by the user; `auto` picks from file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeOverride {
    #[default]
    Auto,
    Full,
    Balanced,
    Aggressive,
}

impl FromStr for ModeOverride {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ModeOverride::Auto),
            "full" => Ok(ModeOverride::Full),
            "balanced" => Ok(ModeOverride::Balanced),
            "aggressive" => Ok(ModeOverride::Aggressive),
            _ => Err(ConfigError::EnvError(format!(
                "Invalid mode: {s}. Valid values: auto, full, balanced, aggressive"
            ))),
        }
    }
}

/// Every tunable of an analysis run. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub mode: ModeOverride,
    pub max_unique_ips: usize,
    pub max_unique_urls: usize,
    pub max_unique_minutes: usize,
    pub small_file_threshold_mb: u64,
    pub medium_file_threshold_mb: u64,
    /// Zero disables pruning.
    pub prune_every_n_lines: u64,
    /// Zero disables progress logging.
    pub progress_every_n_lines: u64,
    pub balanced_prune_percent: u8,
    pub aggressive_prune_percent: u8,
    pub top_n_results: usize,
    pub failure_sample_cap: usize,
    pub failure_report_sample: usize,
    pub read_buffer_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            mode: ModeOverride::Auto,
            max_unique_ips: 100_000,
            max_unique_urls: 50_000,
            max_unique_minutes: 10_000,
            small_file_threshold_mb: 100,
            medium_file_threshold_mb: 1000,
            prune_every_n_lines: 100_000,
            progress_every_n_lines: 100_000,
            balanced_prune_percent: 5,
            aggressive_prune_percent: 20,
            top_n_results: 10,
            failure_sample_cap: 1000,
            failure_report_sample: 5,
            read_buffer_bytes: 1024 * 1024,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional TOML file, then `SNAP_ANALOG_*` variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(mode) = std::env::var("SNAP_ANALOG_MODE") {
            self.mode = mode.parse()?;
        }
        load_env_var("SNAP_ANALOG_MAX_UNIQUE_IPS", &mut self.max_unique_ips)?;
        load_env_var("SNAP_ANALOG_MAX_UNIQUE_URLS", &mut self.max_unique_urls)?;
        load_env_var("SNAP_ANALOG_MAX_UNIQUE_MINUTES", &mut self.max_unique_minutes)?;
        load_env_var(
            "SNAP_ANALOG_SMALL_FILE_THRESHOLD_MB",
            &mut self.small_file_threshold_mb,
        )?;
        load_env_var(
            "SNAP_ANALOG_MEDIUM_FILE_THRESHOLD_MB",
            &mut self.medium_file_threshold_mb,
        )?;
        load_env_var("SNAP_ANALOG_PRUNE_EVERY_N_LINES", &mut self.prune_every_n_lines)?;
        load_env_var(
            "SNAP_ANALOG_PROGRESS_EVERY_N_LINES",
            &mut self.progress_every_n_lines,
        )?;
        load_env_var(
            "SNAP_ANALOG_BALANCED_PRUNE_PERCENT",
            &mut self.balanced_prune_percent,
        )?;
        load_env_var(
            "SNAP_ANALOG_AGGRESSIVE_PRUNE_PERCENT",
            &mut self.aggressive_prune_percent,
        )?;
        load_env_var("SNAP_ANALOG_TOP_N_RESULTS", &mut self.top_n_results)?;
        load_env_var("SNAP_ANALOG_FAILURE_SAMPLE_CAP", &mut self.failure_sample_cap)?;
        load_env_var(
            "SNAP_ANALOG_FAILURE_REPORT_SAMPLE",
            &mut self.failure_report_sample,
        )?;
        load_env_var("SNAP_ANALOG_READ_BUFFER_BYTES", &mut self.read_buffer_bytes)?;
        Ok(())
    }
}
