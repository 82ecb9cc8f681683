// Unit tests for argument parsing and config overrides

use crate::cli::Cli;

use probe_core::config::ProbeConfig;

use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

/// **VALUE**: The historical short and underscore-style long flags keep working.
#[test]
fn given_short_flags_when_parsed_then_base_url_and_count_are_set() {
    let cli = Cli::try_parse_from(["blockprobe", "-u", "http://example.com/", "-c", "25"]).unwrap();

    assert_eq!(cli.base_url, "http://example.com/");
    assert_eq!(cli.request_count, 25);
    assert!(!cli.summary);
    assert_eq!(cli.log_level(), LevelFilter::Warn);
}

#[test]
fn given_long_flags_when_parsed_then_base_url_and_count_are_set() {
    let cli = Cli::try_parse_from([
        "blockprobe",
        "--base_url",
        "https://example.com/x/",
        "--request_count",
        "3",
    ])
    .unwrap();

    assert_eq!(cli.base_url, "https://example.com/x/");
    assert_eq!(cli.request_count, 3);
}

/// **BUG THIS CATCHES**: Would catch the count being accepted as free text, which is what
/// made the loop bound meaningless before.
#[test]
fn given_non_numeric_or_zero_count_when_parsed_then_rejected() {
    for count in ["abc", "0", "-5"] {
        let result = Cli::try_parse_from(["blockprobe", "-u", "http://example.com/", "-c", count]);
        assert!(result.is_err(), "Count {count:?} should be rejected");
    }
}

#[test]
fn given_missing_required_flags_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["blockprobe", "-c", "5"]).is_err());
    assert!(Cli::try_parse_from(["blockprobe", "-u", "http://example.com/"]).is_err());
}

#[test]
fn given_summary_and_json_when_parsed_then_conflict_is_rejected() {
    let result = Cli::try_parse_from([
        "blockprobe",
        "-u",
        "http://example.com/",
        "-c",
        "1",
        "--summary",
        "--json",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_override_flags_when_applied_then_config_values_are_replaced() {
    // GIVEN: Flags for every overridable setting
    let cli = Cli::try_parse_from([
        "blockprobe",
        "-u",
        "http://example.com/",
        "-c",
        "1",
        "--timeout",
        "750ms",
        "--delay",
        "2s",
        "--suffix-length",
        "6",
        "--max-connection-failures",
        "4",
        "--block-status",
        "429",
        "--block-status",
        "403",
    ])
    .unwrap();
    let mut config = ProbeConfig::default();

    // WHEN: Applying them to the defaults
    cli.apply_overrides(&mut config);

    // THEN: Every value is overridden
    assert_eq!(config.request.timeout(), Duration::from_millis(750));
    assert_eq!(config.run.delay(), Duration::from_secs(2));
    assert_eq!(config.run.suffix_length, 6);
    assert_eq!(config.run.max_connection_failures, 4);
    assert_eq!(config.run.block_statuses, vec![429, 403]);
}

#[test]
fn given_no_override_flags_when_applied_then_config_is_unchanged() {
    let cli = Cli::try_parse_from(["blockprobe", "-u", "http://example.com/", "-c", "1"]).unwrap();
    let mut config = ProbeConfig::default();

    cli.apply_overrides(&mut config);

    assert_eq!(config, ProbeConfig::default());
}

#[test]
fn given_out_of_range_block_status_when_parsed_then_rejected() {
    let result = Cli::try_parse_from([
        "blockprobe",
        "-u",
        "http://example.com/",
        "-c",
        "1",
        "--block-status",
        "700",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_verbose_flags_when_counted_then_level_increases() {
    let level_for = |args: &[&str]| {
        let mut argv = vec!["blockprobe", "-u", "http://example.com/", "-c", "1"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().log_level()
    };

    assert_eq!(level_for(&["-v"]), LevelFilter::Info);
    assert_eq!(level_for(&["-vv"]), LevelFilter::Debug);
    assert_eq!(level_for(&["-vvvv"]), LevelFilter::Trace);
}
