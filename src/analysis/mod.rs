pub mod aggregates;
pub mod counter;
pub mod failures;
pub mod memory_mode;
pub mod pipeline;
pub mod report;
pub mod schedule;
pub mod top_k;

pub use aggregates::Aggregates;
pub use counter::{ExactCounter, FieldTracker, TrackerDiagnostics};
pub use failures::{FailureEntry, FailureRecorder, FailureSample};
pub use memory_mode::{MemoryMode, MemoryModeSelector, ModeSelection, TrackerLimits};
pub use pipeline::{AnalysisPipeline, PipelineState};
pub use report::Report;
pub use schedule::LineSchedule;
pub use top_k::{TopKTracker, TrackerStats};
