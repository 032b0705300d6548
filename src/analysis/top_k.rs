//! Bounded-memory approximate frequency tracker.
//!
//! Two tiers: an authoritative `item -> count` map, and a candidate set of at
//! most `k` items held in a min-heap keyed by `(count, item)`. The
//! candidate set is the best-known top-k. It is exact until the first prune;
//! after that, counts of items that were pruned and came back restart from zero.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Rough per-entry footprint used for diagnostics only.
const ESTIMATED_BYTES_PER_ITEM: usize = 100;

/// Heap order is `(count, item)`. Candidates are distinct, so `seq` never
/// decides which minimum is evicted; it only orders ties in the output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    count: u64,
    item: String,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub name: String,
    pub k: usize,
    pub unique_items: usize,
    pub heap_size: usize,
    pub total_adds: u64,
    pub memory_estimate_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct TopKTracker {
    name: String,
    k: usize,
    counts: HashMap<String, u64>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    members: HashSet<String>,
    insertion_counter: u64,
    total_adds: u64,
}

impl TopKTracker {
    pub fn new(k: usize, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            k,
            counts: HashMap::new(),
            heap: BinaryHeap::with_capacity(k),
            members: HashSet::with_capacity(k),
            insertion_counter: 0,
            total_adds: 0,
        }
    }

    pub fn add(&mut self, item: &str) {
        self.total_adds += 1;
        self.insertion_counter += 1;

        let count = match self.counts.get_mut(item) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counts.insert(item.to_string(), 1);
                1
            }
        };

        if self.members.contains(item) {
            self.refresh_heap();
            return;
        }

        if self.heap.len() < self.k {
            self.admit(item, count);
        } else if let Some(Reverse(min)) = self.heap.peek()
            && count > min.count
        {
            if let Some(Reverse(evicted)) = self.heap.pop() {
                self.members.remove(&evicted.item);
            }
            self.admit(item, count);
        }
    }

    fn admit(&mut self, item: &str, count: u64) {
        self.members.insert(item.to_string());
        self.heap.push(Reverse(HeapEntry {
            count,
            seq: self.insertion_counter,
            item: item.to_string(),
        }));
    }

    /// Re-keys every candidate with its current count and re-heapifies in O(k).
    fn refresh_heap(&mut self) {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        for Reverse(entry) in &mut entries {
            if let Some(count) = self.counts.get(&entry.item) {
                entry.count = *count;
            }
        }
        self.heap = BinaryHeap::from(entries);
    }

    /// Drops the lowest-count `percent`% (at least one) of non-candidate items
    /// from the count map. Returns how many entries were removed.
    pub fn prune(&mut self, percent: u8) -> usize {
        if self.counts.len() <= self.k {
            return 0;
        }

        let mut outside: Vec<(&String, u64)> = self
            .counts
            .iter()
            .filter(|(item, _)| !self.members.contains(*item))
            .map(|(item, count)| (item, *count))
            .collect();

        if outside.is_empty() {
            return 0;
        }

        let to_remove = (outside.len() * percent as usize / 100)
            .max(1)
            .min(outside.len());

        // Ties broken by item so repeated runs prune the same entries.
        outside.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        let doomed: Vec<String> = outside[..to_remove]
            .iter()
            .map(|(item, _)| (*item).clone())
            .collect();

        for item in &doomed {
            self.counts.remove(item);
        }

        doomed.len()
    }

    /// Up to `n` candidates with their current counts, highest first; equal
    /// counts keep the order in which the items entered the candidate set.
    pub fn get_top_k(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(u64, u64, &str)> = self
            .heap
            .iter()
            .map(|Reverse(entry)| {
                let current = self.counts.get(&entry.item).copied().unwrap_or(entry.count);
                (current, entry.seq, entry.item.as_str())
            })
            .collect();

        ranked.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        ranked
            .into_iter()
            .take(n)
            .map(|(count, _, item)| (item.to_string(), count))
            .collect()
    }

    pub fn get_count(&self, item: &str) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn is_candidate(&self, item: &str) -> bool {
        self.members.contains(item)
    }

    pub fn capacity(&self) -> usize {
        self.k
    }

    pub fn candidate_len(&self) -> usize {
        self.heap.len()
    }

    /// Number of items in the count map.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_adds(&self) -> u64 {
        self.total_adds
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            name: self.name.clone(),
            k: self.k,
            unique_items: self.counts.len(),
            heap_size: self.heap.len(),
            total_adds: self.total_adds,
            memory_estimate_bytes: self.counts.len() * ESTIMATED_BYTES_PER_ITEM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut TopKTracker, items: &[(&str, usize)]) {
        for (item, times) in items {
            for _ in 0..*times {
                tracker.add(item);
            }
        }
    }

    #[test]
    fn test_exact_when_under_capacity() {
        let mut tracker = TopKTracker::new(10, "ips");
        feed(&mut tracker, &[("a", 3), ("b", 5), ("c", 1)]);

        assert_eq!(
            tracker.get_top_k(10),
            vec![
                ("b".to_string(), 5),
                ("a".to_string(), 3),
                ("c".to_string(), 1)
            ]
        );
        assert_eq!(tracker.total_adds(), 9);
        assert_eq!(tracker.candidate_len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut tracker = TopKTracker::new(10, "urls");
        for item in ["z", "y", "x"] {
            tracker.add(item);
        }
        let top: Vec<String> = tracker.get_top_k(3).into_iter().map(|(i, _)| i).collect();
        assert_eq!(top, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_interleaved_hits_on_candidates() {
        let mut tracker = TopKTracker::new(4, "ips");
        for item in ["a", "b", "a", "c", "b", "a", "d", "a"] {
            tracker.add(item);
        }
        assert_eq!(
            tracker.get_top_k(2),
            vec![("a".to_string(), 4), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_evicts_minimum_when_new_count_is_greater() {
        let mut tracker = TopKTracker::new(2, "ips");
        feed(&mut tracker, &[("a", 3), ("b", 1)]);

        // "c" reaches 1, not greater than b's 1: stays outside.
        tracker.add("c");
        assert!(!tracker.is_candidate("c"));
        assert_eq!(tracker.get_count("c"), 1);

        // Second hit makes it 2 > 1: b is evicted.
        tracker.add("c");
        assert!(tracker.is_candidate("c"));
        assert!(!tracker.is_candidate("b"));
        assert_eq!(
            tracker.get_top_k(5),
            vec![("a".to_string(), 3), ("c".to_string(), 2)]
        );
        // Evicted items keep their exact count until pruned.
        assert_eq!(tracker.get_count("b"), 1);
    }

    #[test]
    fn test_tied_minimum_evicts_by_item_not_age() {
        let mut tracker = TopKTracker::new(2, "ips");
        for item in ["b", "a", "c", "c"] {
            tracker.add(item);
        }

        // "b" is the oldest candidate at count 1, but "a" sorts first.
        assert!(tracker.is_candidate("b"));
        assert!(tracker.is_candidate("c"));
        assert!(!tracker.is_candidate("a"));
        assert_eq!(
            tracker.get_top_k(2),
            vec![("c".to_string(), 2), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_get_top_k_truncates() {
        let mut tracker = TopKTracker::new(5, "minutes");
        feed(&mut tracker, &[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(tracker.get_top_k(1), vec![("c".to_string(), 3)]);
        assert!(tracker.get_top_k(0).is_empty());
    }

    #[test]
    fn test_prune_noop_under_capacity() {
        let mut tracker = TopKTracker::new(5, "ips");
        feed(&mut tracker, &[("a", 1), ("b", 1)]);
        assert_eq!(tracker.prune(50), 0);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_prune_never_touches_candidates() {
        let mut tracker = TopKTracker::new(2, "ips");
        feed(&mut tracker, &[("hot", 10), ("warm", 5)]);
        for i in 0..20 {
            tracker.add(&format!("cold-{i}"));
        }
        assert_eq!(tracker.len(), 22);

        let removed = tracker.prune(50);
        assert_eq!(removed, 10);
        assert_eq!(tracker.len(), 12);
        assert_eq!(tracker.get_count("hot"), 10);
        assert_eq!(tracker.get_count("warm"), 5);
        assert!(tracker.is_candidate("hot"));
        assert!(tracker.is_candidate("warm"));
    }

    #[test]
    fn test_prune_removes_at_least_one_and_lowest_first() {
        let mut tracker = TopKTracker::new(1, "urls");
        feed(&mut tracker, &[("top", 9), ("mid", 3), ("low", 1)]);

        // 1% of 2 rounds to 0, clamped to 1.
        assert_eq!(tracker.prune(1), 1);
        assert_eq!(tracker.get_count("low"), 0);
        assert_eq!(tracker.get_count("mid"), 3);
    }

    #[test]
    fn test_pruned_item_restarts_from_zero() {
        let mut tracker = TopKTracker::new(1, "ips");
        feed(&mut tracker, &[("top", 5), ("gone", 2)]);
        tracker.prune(100);
        assert_eq!(tracker.get_count("gone"), 0);

        tracker.add("gone");
        assert_eq!(tracker.get_count("gone"), 1);
    }

    #[test]
    fn test_stats() {
        let mut tracker = TopKTracker::new(3, "IPs");
        feed(&mut tracker, &[("a", 2), ("b", 1)]);
        let stats = tracker.stats();
        assert_eq!(stats.name, "IPs");
        assert_eq!(stats.k, 3);
        assert_eq!(stats.unique_items, 2);
        assert_eq!(stats.heap_size, 2);
        assert_eq!(stats.total_adds, 3);
        assert_eq!(stats.memory_estimate_bytes, 200);
    }

    #[test]
    fn test_zero_capacity_tracks_nothing() {
        let mut tracker = TopKTracker::new(0, "none");
        tracker.add("a");
        assert!(tracker.get_top_k(10).is_empty());
        assert_eq!(tracker.get_count("a"), 1);
    }
}
