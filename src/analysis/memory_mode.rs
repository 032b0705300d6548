//! Maps input size to a counting strategy and per-field capacity caps.

use crate::app::config::{AnalyzerConfig, ModeOverride};
use serde::{Deserialize, Serialize};
use std::fmt;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryMode {
    /// Exact counters, no eviction, no pruning.
    Full,
    /// Bounded trackers at the configured caps.
    Balanced,
    /// Bounded trackers at half the configured caps.
    Aggressive,
}

impl MemoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryMode::Full => "FULL",
            MemoryMode::Balanced => "BALANCED",
            MemoryMode::Aggressive => "AGGRESSIVE",
        }
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, MemoryMode::Full)
    }

    /// Share of non-candidate entries dropped on each prune cycle.
    pub fn prune_percent(&self, config: &AnalyzerConfig) -> u8 {
        match self {
            MemoryMode::Full => 0,
            MemoryMode::Balanced => config.balanced_prune_percent,
            MemoryMode::Aggressive => config.aggressive_prune_percent,
        }
    }

    pub fn limits(&self, config: &AnalyzerConfig) -> TrackerLimits {
        match self {
            MemoryMode::Full => TrackerLimits::unbounded(),
            MemoryMode::Balanced => TrackerLimits {
                max_ips: config.max_unique_ips,
                max_urls: config.max_unique_urls,
                max_minutes: config.max_unique_minutes,
            },
            MemoryMode::Aggressive => TrackerLimits {
                max_ips: config.max_unique_ips / 2,
                max_urls: config.max_unique_urls / 2,
                max_minutes: config.max_unique_minutes / 2,
            },
        }
    }
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate-set capacity per tracked field. Zero means unbounded (FULL mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerLimits {
    pub max_ips: usize,
    pub max_urls: usize,
    pub max_minutes: usize,
}

impl TrackerLimits {
    pub const fn unbounded() -> Self {
        Self {
            max_ips: 0,
            max_urls: 0,
            max_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSelection {
    pub mode: MemoryMode,
    pub limits: TrackerLimits,
    pub file_size_mb: f64,
}

pub struct MemoryModeSelector<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> MemoryModeSelector<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// `file_size_bytes` is 0 when the size could not be determined.
    pub fn select(&self, file_size_bytes: u64) -> ModeSelection {
        let file_size_mb = file_size_bytes as f64 / BYTES_PER_MB;

        let mode = match self.config.mode {
            ModeOverride::Full => MemoryMode::Full,
            ModeOverride::Balanced => MemoryMode::Balanced,
            ModeOverride::Aggressive => MemoryMode::Aggressive,
            ModeOverride::Auto => self.mode_for_size(file_size_mb),
        };

        ModeSelection {
            mode,
            limits: mode.limits(self.config),
            file_size_mb,
        }
    }

    fn mode_for_size(&self, file_size_mb: f64) -> MemoryMode {
        if file_size_mb < self.config.small_file_threshold_mb as f64 {
            MemoryMode::Full
        } else if file_size_mb < self.config.medium_file_threshold_mb as f64 {
            MemoryMode::Balanced
        } else {
            MemoryMode::Aggressive
        }
    }
}
