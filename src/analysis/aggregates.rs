use super::counter::FieldTracker;
use super::memory_mode::TrackerLimits;
use super::report::SizeStats;
use crate::domain::{HttpMethod, ParsedRecord};
use std::collections::BTreeMap;

const BASE_STATUS_GROUPS: [&str; 5] = ["2xx", "3xx", "4xx", "5xx", "Unknown"];

/// Every counter fed by accepted records. One `accept` call per valid line.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub total_requests: u64,
    pub statuses: BTreeMap<String, u64>,
    pub status_groups: BTreeMap<String, u64>,
    pub methods: BTreeMap<HttpMethod, u64>,
    pub sizes: SizeStats,
    pub ips: FieldTracker,
    pub urls: FieldTracker,
    pub minutes: FieldTracker,
}

impl Aggregates {
    pub fn new(limits: &TrackerLimits) -> Self {
        Self {
            total_requests: 0,
            statuses: BTreeMap::new(),
            status_groups: BASE_STATUS_GROUPS
                .iter()
                .map(|group| ((*group).to_string(), 0))
                .collect(),
            methods: BTreeMap::new(),
            sizes: SizeStats::default(),
            ips: FieldTracker::with_capacity(limits.max_ips, "IPs"),
            urls: FieldTracker::with_capacity(limits.max_urls, "URLs"),
            minutes: FieldTracker::with_capacity(limits.max_minutes, "Minutes"),
        }
    }

    pub fn accept(&mut self, record: &ParsedRecord) {
        self.total_requests += 1;

        self.ips.add(&record.ip);
        self.urls.add(&record.path);
        self.minutes.add(&record.minute);

        *self.statuses.entry(record.status.clone()).or_insert(0) += 1;
        *self
            .status_groups
            .entry(record.status_group.clone())
            .or_insert(0) += 1;
        *self.methods.entry(record.method).or_insert(0) += 1;

        if let Some(size) = record.size {
            self.sizes.record(size);
        }
    }

    /// Prunes every tracker; returns entries removed per tracker (ips, urls, minutes).
    pub fn prune(&mut self, percent: u8) -> (usize, usize, usize) {
        (
            self.ips.prune(percent),
            self.urls.prune(percent),
            self.minutes.prune(percent),
        )
    }
}
