//! Bounded sample of malformed lines, for diagnostics only.

use crate::domain::FailureReason;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FailureEntry {
    pub count: u64,
    pub reason: FailureReason,
}

#[derive(Debug, Clone)]
pub struct FailureRecorder {
    cap: usize,
    index: HashMap<String, usize>,
    entries: Vec<(String, FailureEntry)>,
    total: u64,
    by_reason: HashMap<FailureReason, u64>,
}

impl FailureRecorder {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            index: HashMap::new(),
            entries: Vec::new(),
            total: 0,
            by_reason: HashMap::new(),
        }
    }

    /// Known lines are always counted; new lines are kept only below the cap.
    pub fn record(&mut self, line: &str, reason: FailureReason) {
        self.total += 1;
        *self.by_reason.entry(reason).or_insert(0) += 1;

        if let Some(&slot) = self.index.get(line) {
            self.entries[slot].1.count += 1;
            return;
        }

        if self.entries.len() < self.cap {
            self.index.insert(line.to_string(), self.entries.len());
            self.entries
                .push((line.to_string(), FailureEntry { count: 1, reason }));
        }
    }

    /// Distinct lines held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every rejected line, including those not kept in the sample.
    pub fn total_failures(&self) -> u64 {
        self.total
    }

    pub fn count_for(&self, reason: FailureReason) -> u64 {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }

    pub fn get(&self, line: &str) -> Option<&FailureEntry> {
        self.index.get(line).map(|&slot| &self.entries[slot].1)
    }

    /// First `n` distinct lines in the order they were first seen.
    pub fn sample(&self, n: usize) -> FailureSample {
        FailureSample(self.entries.iter().take(n).cloned().collect())
    }
}

/// Serializes as a JSON object keyed by line text, preserving first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureSample(pub Vec<(String, FailureEntry)>);

impl FailureSample {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FailureSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (line, entry) in &self.0 {
            map.serialize_entry(line, entry)?;
        }
        map.end()
    }
}
