pub mod cli;
pub mod config;
pub mod generator;
pub mod info;
pub mod logging_system;

pub use cli::{AnalyzeArgs, Cli, Command, GenerateArgs};
pub use config::{AnalyzerConfig, ConfigError, LogFormat, LogLevel, ModeOverride};
pub use generator::{GenerateOptions, GeneratorError, SyntheticFormat};
pub use info::SystemInfo;
pub use logging_system::{InitializationError, setup_logging};

use crate::analysis::{AnalysisPipeline, Report};
use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::info;

/// Report path used when `--output` is not given.
pub fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "log_analysis_{}.json",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<Report> {
    let config = args
        .resolve_config()
        .context("Failed to build analyzer configuration")?;

    let mut pipeline = AnalysisPipeline::new(config)?;
    let report = pipeline
        .analyze_file(&args.logfile)
        .with_context(|| format!("Analysis of {} failed", args.logfile.display()))?;

    let output = args.output.clone().unwrap_or_else(default_report_path);
    let json = report.to_json_pretty()?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    info!(report = %output.display(), "Report saved");

    println!("Analysis completed in {:.2}s", report.summary.analysis_time_seconds);
    println!("Report saved to: {}", output.display());
    println!("Memory mode: {}", report.summary.memory_mode);
    println!("Total lines: {}", report.summary.total_lines);
    println!("Parsed requests: {}", report.summary.total_requests);
    println!("Success rate: {}", report.health_metrics.success_rate_2xx_3xx);

    Ok(report)
}

pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<u64> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let size = generator::write_synthetic_log(&args.output, &args.options(), &mut rng)
        .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    println!("Test log generated: {}", args.output.display());
    println!("Size: {:.1} KB ({size} bytes)", size as f64 / 1024.0);
    println!("Lines: {}", args.lines);

    Ok(size)
}

pub fn run_info() {
    println!("{}", SystemInfo::collect());
}

// Main entry point for the application
pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.log_level, cli.log_format) {
        eprintln!("Warning: {e}, continuing without structured logging");
    }

    match &cli.command {
        Command::Analyze(args) => {
            run_analyze(args)?;
        }
        Command::GenerateTest(args) => {
            run_generate(args)?;
        }
        Command::Info => run_info(),
    }

    Ok(())
}
