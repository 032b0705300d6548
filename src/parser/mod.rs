pub mod access_log;
pub mod regex_error;
pub mod regex_patterns;
pub mod validators;

pub use access_log::{LineError, LineParser};
pub use regex_error::RegexError;
pub use validators::ValidationError;
