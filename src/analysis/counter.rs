use super::top_k::{TopKTracker, TrackerStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unbounded exact counter. Ties rank by first appearance.
#[derive(Debug, Clone, Default)]
pub struct ExactCounter {
    counts: HashMap<String, (u64, u64)>, // item -> (count, first seen)
    next_seq: u64,
}

impl ExactCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: &str) {
        if let Some((count, _)) = self.counts.get_mut(item) {
            *count += 1;
        } else {
            self.counts.insert(item.to_string(), (1, self.next_seq));
            self.next_seq += 1;
        }
    }

    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(&String, u64, u64)> = self
            .counts
            .iter()
            .map(|(item, (count, seq))| (item, *count, *seq))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked
            .into_iter()
            .take(n)
            .map(|(item, count, _)| (item.clone(), count))
            .collect()
    }

    pub fn get_count(&self, item: &str) -> u64 {
        self.counts.get(item).map_or(0, |(count, _)| *count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Per-tracker diagnostics as they appear in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackerDiagnostics {
    Bounded(TrackerStats),
    Exact { unique_items: usize, mode: String },
}

/// Counting strategy for one field, fixed when the pipeline starts.
#[derive(Debug, Clone)]
pub enum FieldTracker {
    Exact(ExactCounter),
    Bounded(TopKTracker),
}

impl FieldTracker {
    /// `capacity == 0` selects exact counting.
    pub fn with_capacity(capacity: usize, name: &str) -> Self {
        if capacity == 0 {
            FieldTracker::Exact(ExactCounter::new())
        } else {
            FieldTracker::Bounded(TopKTracker::new(capacity, name))
        }
    }

    pub fn add(&mut self, item: &str) {
        match self {
            FieldTracker::Exact(counter) => counter.add(item),
            FieldTracker::Bounded(tracker) => tracker.add(item),
        }
    }

    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        match self {
            FieldTracker::Exact(counter) => counter.most_common(n),
            FieldTracker::Bounded(tracker) => tracker.get_top_k(n),
        }
    }

    /// Exact counters never prune.
    pub fn prune(&mut self, percent: u8) -> usize {
        match self {
            FieldTracker::Exact(_) => 0,
            FieldTracker::Bounded(tracker) => tracker.prune(percent),
        }
    }

    pub fn diagnostics(&self) -> TrackerDiagnostics {
        match self {
            FieldTracker::Exact(counter) => TrackerDiagnostics::Exact {
                unique_items: counter.len(),
                mode: "FULL".to_string(),
            },
            FieldTracker::Bounded(tracker) => TrackerDiagnostics::Bounded(tracker.stats()),
        }
    }
}
