use crate::config::ProbeConfig;
use crate::error::config::ConfigError;
use crate::DEFAULT_USER_AGENT;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn given_defaults_when_inspected_then_match_documented_values() {
    let config = ProbeConfig::default();

    assert_eq!(config.request.timeout(), Duration::from_secs(10));
    assert_eq!(config.request.user_agent(), DEFAULT_USER_AGENT);
    assert_eq!(config.run.suffix_length, 12);
    assert_eq!(config.run.max_connection_failures, 10);
    assert_eq!(config.run.block_statuses, vec![403]);
    assert_eq!(config.run.delay(), Duration::ZERO);
    assert!(config.validate().is_ok());
}

/// **VALUE**: A partial file only overrides the keys it names.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` that makes every key
/// mandatory and rejects small config files.
#[test]
fn given_partial_toml_when_loaded_then_missing_keys_use_defaults() {
    let file = write_config(
        r#"
[run]
suffix_length = 8
block_statuses = [403, 429]

[retry]
initial_interval_ms = 50
"#,
    );

    let config = ProbeConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.run.suffix_length, 8);
    assert_eq!(config.run.block_statuses, vec![403, 429]);
    assert_eq!(config.run.max_connection_failures, 10);
    assert_eq!(config.retry.initial_interval(), Duration::from_millis(50));
    assert_eq!(config.request.timeout_ms, 10_000);
}

#[test]
fn given_missing_explicit_path_when_loaded_then_returns_not_found() {
    let result = ProbeConfig::load(Some(Path::new("/nonexistent/blockprobe/config.toml")));

    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn given_malformed_toml_when_loaded_then_returns_parse_error() {
    let file = write_config("[run\nsuffix_length = ");

    let result = ProbeConfig::load(Some(file.path()));

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_values_in_file_when_loaded_then_returns_validation_error() {
    let file = write_config("[run]\nsuffix_length = 0\n");

    let result = ProbeConfig::load(Some(file.path()));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_out_of_range_values_when_validated_then_each_is_rejected() {
    let cases: Vec<Box<dyn Fn(&mut ProbeConfig)>> = vec![
        Box::new(|c| c.request.timeout_ms = 0),
        Box::new(|c| c.run.max_connection_failures = 0),
        Box::new(|c| c.run.block_statuses.clear()),
        Box::new(|c| c.run.block_statuses = vec![403, 99]),
        Box::new(|c| c.run.block_statuses = vec![600]),
        Box::new(|c| {
            c.retry.initial_interval_ms = 2_000;
            c.retry.max_interval_ms = 1_000;
        }),
    ];

    for (index, mutate) in cases.iter().enumerate() {
        let mut config = ProbeConfig::default();
        mutate(&mut config);

        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "Case {index} should fail validation"
        );
    }
}

#[test]
fn given_custom_user_agent_when_read_then_overrides_default() {
    let file = write_config("[request]\nuser_agent = \"probe-test/1.0\"\ntimeout_ms = 250\n");

    let config = ProbeConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.request.user_agent(), "probe-test/1.0");
    assert_eq!(config.request.timeout(), Duration::from_millis(250));
}

/// **VALUE**: Config errors point at the code that asked for the config.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[track_caller]` on `load`,
/// `load_from_path`, or `validate`, which makes every config error report a line
/// inside config.rs instead of the call site.
#[test]
fn given_config_errors_when_raised_then_location_is_the_caller() {
    let missing = Path::new("/nonexistent/blockprobe/config.toml");
    let (not_found, not_found_line) = (ProbeConfig::load(Some(missing)), line!());

    let malformed = write_config("[run\n");
    let (parse, parse_line) = (ProbeConfig::load(Some(malformed.path())), line!());

    let invalid = write_config("[run]\nsuffix_length = 0\n");
    let (validation, validation_line) = (ProbeConfig::load_from_path(invalid.path()), line!());

    for (result, expected_line) in [
        (not_found, not_found_line),
        (parse, parse_line),
        (validation, validation_line),
    ] {
        let location = match result {
            Err(ConfigError::NotFound { location, .. })
            | Err(ConfigError::ParseError { location, .. })
            | Err(ConfigError::ValidationError { location, .. }) => location,
            other => panic!("Expected a config error, got {other:?}"),
        };
        assert!(
            location.file.contains("tests"),
            "Location should be in the test file, got {location}"
        );
        assert_eq!(location.line, expected_line);
    }
}
