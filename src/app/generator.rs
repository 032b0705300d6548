//! Synthetic log files for trying the analyzer without production data.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];
const STATUSES: &[u16] = &[200, 404, 500, 301, 400, 403];
const PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/api/users",
    "/api/data",
    "/admin",
    "/login",
    "/products",
    "/cart",
];
const USER_AGENTS: &[&str] = &["Mozilla/5.0", "Chrome/91.0", "Safari/14.0", "PostmanRuntime/7.28"];
const SYSLOG_PROCESSES: &[&str] = &["sshd", "kernel", "cron", "nginx", "apache"];

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S +0300";
const SECONDS_PER_LINE: i64 = 2;
const QUERY_PROBABILITY: f64 = 0.3;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("File already exists: {0} (use --overwrite to replace it)")]
    AlreadyExists(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid start time")]
    InvalidStartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SyntheticFormat {
    /// Common log format, readable by `analyze`
    #[default]
    Apache,
    /// Common log format plus referer and user agent
    Nginx,
    /// One JSON object per line
    Json,
    /// BSD-style syslog messages
    Syslog,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub lines: u64,
    pub format: SyntheticFormat,
    pub overwrite: bool,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    timestamp: &'a str,
    ip: &'a str,
    method: &'a str,
    path: &'a str,
    status: u16,
    size: u32,
    user_agent: &'a str,
}

fn pick<'a, T: ?Sized, R: Rng>(rng: &mut R, items: &'a [&'a T]) -> &'a T {
    items[rng.random_range(0..items.len())]
}

fn start_time() -> Result<NaiveDateTime, GeneratorError> {
    NaiveDate::from_ymd_opt(2023, 10, 10)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or(GeneratorError::InvalidStartTime)
}

/// Writes `lines` synthetic entries to `out`.
pub fn write_lines<W: Write, R: Rng>(
    out: &mut W,
    lines: u64,
    format: SyntheticFormat,
    rng: &mut R,
) -> Result<(), GeneratorError> {
    let start = start_time()?;

    for i in 0..lines {
        let offset = i64::try_from(i).unwrap_or(i64::MAX / SECONDS_PER_LINE) * SECONDS_PER_LINE;
        let timestamp = (start + Duration::seconds(offset))
            .format(TIMESTAMP_FORMAT)
            .to_string();
        let ip = format!(
            "192.168.{}.{}",
            rng.random_range(1..=255u8),
            rng.random_range(1..=255u8)
        );
        let method = pick(rng, METHODS);
        let mut path = pick(rng, PATHS).to_string();
        if rng.random_bool(QUERY_PROBABILITY) {
            path.push_str(&format!("?id={}", rng.random_range(1000..=9999)));
        }
        let status = STATUSES[rng.random_range(0..STATUSES.len())];
        let size: u32 = rng.random_range(100..=10_000);

        match format {
            SyntheticFormat::Apache => writeln!(
                out,
                "{ip} - - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size}"
            )?,
            SyntheticFormat::Nginx => {
                let referer = if rng.random_bool(0.5) {
                    "-".to_string()
                } else {
                    format!("\"http://example.com{}\"", pick(rng, PATHS))
                };
                let agent = pick(rng, USER_AGENTS);
                writeln!(
                    out,
                    "{ip} - - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size} {referer} \"{agent}\""
                )?
            }
            SyntheticFormat::Json => {
                let entry = JsonEntry {
                    timestamp: &timestamp,
                    ip: &ip,
                    method,
                    path: &path,
                    status,
                    size,
                    user_agent: pick(rng, USER_AGENTS),
                };
                serde_json::to_writer(&mut *out, &entry)?;
                out.write_all(b"\n")?;
            }
            SyntheticFormat::Syslog => {
                let process = pick(rng, SYSLOG_PROCESSES);
                let pid = rng.random_range(1000..=9999);
                let message = match rng.random_range(0..5) {
                    0 => format!("Connection from {ip}"),
                    1 => "Failed password for root".to_string(),
                    2 => "CPU temperature above threshold".to_string(),
                    3 => "User login successful".to_string(),
                    _ => "Disk space warning".to_string(),
                };
                writeln!(out, "{timestamp} server1 {process}[{pid}]: {message}")?
            }
        }
    }

    Ok(())
}

/// Creates `path` (and missing parent directories) and fills it with
/// synthetic entries. Returns the number of bytes written.
pub fn write_synthetic_log<R: Rng>(
    path: &Path,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<u64, GeneratorError> {
    if path.exists() && !options.overwrite {
        return Err(GeneratorError::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        tracing::info!(dir = %parent.display(), "Creating directory");
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    write_lines(&mut out, options.lines, options.format, rng)?;
    out.flush()?;
    drop(out);

    Ok(fs::metadata(path)?.len())
}
