//! Final analysis report. Built once when the stream ends, never mutated after.

use super::counter::TrackerDiagnostics;
use super::failures::FailureSample;
use super::memory_mode::{MemoryMode, TrackerLimits};
use crate::domain::HttpMethod;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub health_metrics: HealthMetrics,
    pub traffic_analysis: TrafficAnalysis,
    pub size_analysis: SizeAnalysis,
    pub memory_optimization: MemoryOptimization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub file: String,
    pub file_size_mb: f64,
    pub memory_mode: MemoryMode,
    pub total_lines: u64,
    pub total_requests: u64,
    pub analysis_time_seconds: f64,
    pub lines_per_second: f64,
    pub parsing_success_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub success_rate_2xx_3xx: String,
    pub client_error_rate_4xx: String,
    pub server_error_rate_5xx: String,
    pub status_groups: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficAnalysis {
    pub top_ips: Vec<(String, u64)>,
    pub top_urls: Vec<(String, u64)>,
    pub top_minutes: Vec<(String, u64)>,
    pub status_distribution: BTreeMap<String, u64>,
    pub methods: BTreeMap<HttpMethod, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeAnalysis {
    pub min_bytes: Option<u64>,
    pub max_bytes: Option<u64>,
    pub avg_bytes: Option<f64>,
    pub total_bytes: Option<u64>,
    pub requests_with_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryOptimization {
    pub mode: MemoryMode,
    pub limits: TrackerLimits,
    pub tracker_stats: TrackerStatsSet,
    pub failed_attempts_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_failures: Option<FailureSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerStatsSet {
    pub ips: TrackerDiagnostics,
    pub urls: TrackerDiagnostics,
    pub minutes: TrackerDiagnostics,
}

/// Running min/max/sum over response sizes that parsed as integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeStats {
    min: Option<u64>,
    max: Option<u64>,
    total: u64,
    count: u64,
}

impl SizeStats {
    pub fn record(&mut self, size: u64) {
        self.total = self.total.saturating_add(size);
        self.count += 1;
        self.min = Some(self.min.map_or(size, |m| m.min(size)));
        self.max = Some(self.max.map_or(size, |m| m.max(size)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn analysis(&self) -> SizeAnalysis {
        if self.count == 0 {
            return SizeAnalysis {
                min_bytes: None,
                max_bytes: None,
                avg_bytes: None,
                total_bytes: None,
                requests_with_size: 0,
            };
        }

        SizeAnalysis {
            min_bytes: self.min,
            max_bytes: self.max,
            avg_bytes: Some(self.total as f64 / self.count as f64),
            total_bytes: Some(self.total),
            requests_with_size: self.count,
        }
    }
}

/// `part / total` as a percentage, 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl HealthMetrics {
    pub fn from_groups(status_groups: BTreeMap<String, u64>, total_requests: u64) -> Self {
        let group = |name: &str| status_groups.get(name).copied().unwrap_or(0);

        Self {
            success_rate_2xx_3xx: format_percent(percentage(
                group("2xx") + group("3xx"),
                total_requests,
            )),
            client_error_rate_4xx: format_percent(percentage(group("4xx"), total_requests)),
            server_error_rate_5xx: format_percent(percentage(group("5xx"), total_requests)),
            status_groups,
        }
    }
}

impl Report {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
