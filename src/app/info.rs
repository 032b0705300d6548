use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub hostname: String,
    pub available_parallelism: usize,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            version: crate::VERSION,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            hostname,
            available_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SYSTEM INFORMATION")?;
        writeln!(f, "{}", "-".repeat(40))?;
        writeln!(f, "snap-analog: {}", self.version)?;
        writeln!(f, "OS: {} ({})", self.os, self.arch)?;
        writeln!(f, "Host: {}", self.hostname)?;
        write!(f, "CPU: {} threads", self.available_parallelism)
    }
}
