// Configuration layering: defaults, TOML file, environment
use serial_test::serial;
use snap_analog::app::{AnalyzerConfig, ConfigError, ModeOverride};
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
#[serial]
fn test_defaults_without_file() {
    let config = AnalyzerConfig::load(None).unwrap();
    assert_eq!(config, AnalyzerConfig::default());
    assert_eq!(config.max_unique_ips, 100_000);
    assert_eq!(config.prune_every_n_lines, 100_000);
    assert_eq!(config.failure_sample_cap, 1000);
}

#[test]
#[serial]
fn test_file_then_env() {
    let file = toml_file(
        r#"
        mode = "aggressive"
        top_n_results = 20
        max_unique_urls = 500
        "#,
    );

    unsafe {
        std::env::set_var("SNAP_ANALOG_TOP_N_RESULTS", "7");
    }
    let config = AnalyzerConfig::load(Some(file.path()));
    unsafe {
        std::env::remove_var("SNAP_ANALOG_TOP_N_RESULTS");
    }

    let config = config.unwrap();
    assert_eq!(config.mode, ModeOverride::Aggressive);
    assert_eq!(config.max_unique_urls, 500);
    assert_eq!(config.top_n_results, 7);
}

#[test]
#[serial]
fn test_invalid_file_values_rejected() {
    let file = toml_file("small_file_threshold_mb = 5000");
    assert!(matches!(
        AnalyzerConfig::load(Some(file.path())),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
#[serial]
fn test_missing_file_is_file_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AnalyzerConfig::load(Some(&dir.path().join("nope.toml"))),
        Err(ConfigError::FileError(_))
    ));
}

#[test]
#[serial]
fn test_invalid_env_mode() {
    unsafe {
        std::env::set_var("SNAP_ANALOG_MODE", "warp");
    }
    let result = AnalyzerConfig::load(None);
    unsafe {
        std::env::remove_var("SNAP_ANALOG_MODE");
    }
    assert!(matches!(result, Err(ConfigError::EnvError(_))));
}
