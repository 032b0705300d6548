// Access-log pattern, compiled once and shared by every parser
use super::regex_error::RegexError;
use regex::Regex;
use std::sync::OnceLock;

/// `IP IDENT USER [TIMESTAMP] "REQUEST" STATUS SIZE`, anchored at the start of
/// the line. Anything after SIZE (referer, user agent) is ignored.
const ACCESS_LOG_PATTERN: &str = concat!(
    r"^(?P<ip>\S+)\s+",
    r"(?P<identd>\S+)\s+",
    r"(?P<authuser>\S+)\s+",
    r"\[(?P<timestamp>[^\]]+)\]\s+",
    r#""(?P<request>[^"]*)"\s+"#,
    r"(?P<status>\d{3})\s+",
    r"(?P<size>\d+|-)",
);

static ACCESS_LOG: OnceLock<Result<Regex, RegexError>> = OnceLock::new();

fn compile(pattern: &str, name: &str) -> Result<Regex, RegexError> {
    Regex::new(pattern).map_err(|source| RegexError::CompilationFailed {
        pattern: pattern.to_string(),
        name: name.to_string(),
        source,
    })
}

/// The access-log regex. A compilation failure is cached and returned on every call.
pub fn access_log() -> Result<&'static Regex, RegexError> {
    ACCESS_LOG
        .get_or_init(|| compile(ACCESS_LOG_PATTERN, "access_log"))
        .as_ref()
        .map_err(Clone::clone)
}
