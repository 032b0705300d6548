pub mod error;
pub mod failure;
pub mod record;

pub use error::AnalysisError;
pub use failure::FailureReason;
pub use record::{HttpMethod, ParsedRecord};
