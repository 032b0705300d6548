use super::config::{AnalyzerConfig, ConfigError, LogFormat, LogLevel, ModeOverride};
use super::generator::{GenerateOptions, SyntheticFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bounded-memory access-log analyzer", long_about = None)]
pub struct Cli {
    /// Diagnostic log level (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "SNAP_ANALOG_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Diagnostic log format
    #[arg(long, global = true, env = "SNAP_ANALOG_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze an access log and write a JSON report
    Analyze(AnalyzeArgs),
    /// Generate a synthetic log file
    GenerateTest(GenerateArgs),
    /// Show system information
    Info,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Access log to analyze
    pub logfile: PathBuf,

    /// Memory mode; `auto` picks from the file size
    #[arg(long)]
    pub mode: Option<ModeOverride>,

    /// Report path (default: log_analysis_<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress logging
    #[arg(short, long)]
    pub quiet: bool,

    /// TOML configuration file
    #[arg(long, env = "SNAP_ANALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Entries per top list
    #[arg(long)]
    pub top_n: Option<usize>,
}

impl AnalyzeArgs {
    /// Layers CLI flags over defaults, config file and environment.
    pub fn resolve_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        let mut config = AnalyzerConfig::load(self.config.as_deref())?;

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(top_n) = self.top_n {
            config.top_n_results = top_n;
        }
        if self.quiet {
            config.progress_every_n_lines = 0;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of lines
    #[arg(long, default_value = "1000")]
    pub lines: u64,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "apache")]
    pub format: SyntheticFormat,

    /// Replace an existing file
    #[arg(long)]
    pub overwrite: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            lines: self.lines,
            format: self.format,
            overwrite: self.overwrite,
        }
    }
}
