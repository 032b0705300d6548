/// "Every N lines" cadence used for progress reporting and pruning.
///
/// Line numbers are 1-based physical lines. A period of zero never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSchedule {
    every: u64,
}

impl LineSchedule {
    pub const fn every(lines: u64) -> Self {
        Self { every: lines }
    }

    pub fn is_due(&self, line_number: u64) -> bool {
        self.every != 0 && line_number != 0 && line_number % self.every == 0
    }
}
