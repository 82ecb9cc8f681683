use blockprobe::app::execute;
use blockprobe::cli::Cli;
use blockprobe::error::BlockprobeError;

use probe_core::error::CoreError;
use probe_core::error::config::ConfigError;
use probe_core::error::target::TargetError;

use std::io::Write;
use std::time::Instant;

use clap::Parser;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// End-to-end tests for the binary's execute() path
// A config file is always passed explicitly so the user's own config is never read
// ============================================================================

fn fast_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[retry]\ninitial_interval_ms = 1\nmax_interval_ms = 5\n"
    )
    .unwrap();
    file
}

fn cli_for(base_url: &str, count: &str, config: &NamedTempFile, extra: &[&str]) -> Cli {
    let config_path = config.path().to_str().unwrap();
    let mut argv = vec![
        "blockprobe",
        "-u",
        base_url,
        "-c",
        count,
        "--config",
        config_path,
    ];
    argv.extend_from_slice(extra);
    Cli::try_parse_from(argv).unwrap()
}

/// **VALUE**: The full CLI path prints probe lines, the block message, and the summary.
///
/// **BUG THIS CATCHES**: Would catch CLI flags not reaching the session (suffix length,
/// summary) or the summary being printed before the probe lines.
#[tokio::test]
async fn given_blocking_server_when_executed_with_summary_then_prints_lines_and_tally() {
    // GIVEN: Two 404s, then 403
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/p/[a-z0-9]{6}$"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/p/[a-z0-9]{6}$"))
        .respond_with(ResponseTemplate::new(403))
        .with_priority(2)
        .mount(&server)
        .await;
    let config = fast_config();
    let base_url = format!("{}/p/", server.uri());
    let cli = cli_for(&base_url, "50", &config, &["--suffix-length", "6", "--summary"]);

    // WHEN: Executing
    let mut out = Vec::new();
    let report = execute(&cli, Instant::now(), &mut out).await.unwrap();

    // THEN: Probe lines, block message, then the tally
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with(&base_url) && lines[0].ends_with(": 404"));
    assert!(lines[1].ends_with(": 404"));
    assert!(lines[2].ends_with(": 403"));
    assert_eq!(lines[3], "We were blocked in 0 seconds!");
    assert_eq!(lines[4], "Requests sent: 3");
    assert!(text.contains("  403: 1\n"));
    assert!(text.contains("  404: 2\n"));
    assert!(report.is_blocked());
}

#[tokio::test]
async fn given_json_flag_when_executed_then_report_is_printed_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let config = fast_config();
    let cli = cli_for(&format!("{}/", server.uri()), "2", &config, &["--json"]);

    let mut out = Vec::new();
    execute(&cli, Instant::now(), &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let json_start = text.find('{').unwrap();
    let json: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();
    assert_eq!(json["requests_sent"], 2);
    assert_eq!(json["status_counts"]["200"], 2);
    assert_eq!(json["outcome"]["kind"], "completed");
}

#[tokio::test]
async fn given_invalid_base_url_when_executed_then_returns_target_error() {
    let config = fast_config();
    let cli = cli_for("ftp://example.com/", "1", &config, &[]);

    let mut out = Vec::new();
    let result = execute(&cli, Instant::now(), &mut out).await;

    assert!(matches!(
        result,
        Err(BlockprobeError::Core(CoreError::Target(
            TargetError::UnsupportedScheme { .. }
        )))
    ));
    assert!(out.is_empty(), "Nothing should be probed");
}

/// **VALUE**: Flag overrides are validated too, not only the config file.
#[tokio::test]
async fn given_zero_suffix_length_flag_when_executed_then_returns_validation_error() {
    let config = fast_config();
    let cli = cli_for("http://example.com/", "1", &config, &["--suffix-length", "0"]);

    let mut out = Vec::new();
    let result = execute(&cli, Instant::now(), &mut out).await;

    assert!(matches!(
        result,
        Err(BlockprobeError::Core(CoreError::Config(
            ConfigError::ValidationError { .. }
        )))
    ));
}
