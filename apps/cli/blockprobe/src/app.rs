//! Wires CLI arguments into a probe session.

use crate::cli::Cli;
use crate::error::BlockprobeError;

use probe_core::client::ProbeClient;
use probe_core::config::ProbeConfig;
use probe_core::report::ProbeReport;
use probe_core::session::{ProbeSession, SessionSettings};
use probe_core::suffix::SuffixGenerator;
use probe_core::target::ProbeTarget;

use common::ErrorLocation;

use std::io::Write;
use std::panic::Location;
use std::time::Instant;

use log::{debug, info};

/// Load config, run the session, and print the optional summary.
///
/// Probe lines go to `out`. `started` is the program start used for the
/// "blocked in N seconds" message.
///
/// # Errors
///
/// Returns [`BlockprobeError`] for invalid configuration or base URL, if the
/// HTTP client cannot be built, or if writing to `out` fails.
pub async fn execute<W: Write>(
    cli: &Cli,
    started: Instant,
    out: &mut W,
) -> Result<ProbeReport, BlockprobeError> {
    let mut config = ProbeConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    debug!("Effective config: {config:?}");

    let target = ProbeTarget::parse(&cli.base_url)?;
    let client = ProbeClient::new(config.request.timeout(), config.request.user_agent())?;
    let generator = SuffixGenerator::new(config.run.suffix_length);
    let settings = SessionSettings::from_config(cli.request_count, &config);

    let mut session = ProbeSession::new(client, target, generator, settings).started_at(started);
    let report = session.run(out).await?;

    info!(
        "Run finished: {} ({} requests, {} connection errors)",
        report.outcome, report.requests_sent, report.connection_errors
    );

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| BlockprobeError::Blockprobe {
            message: format!("Failed to serialize report: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        writeln!(out, "{json}").map_err(output_error)?;
    } else if cli.summary {
        report.write_summary(out).map_err(output_error)?;
    }

    Ok(report)
}

#[track_caller]
fn output_error(error: std::io::Error) -> BlockprobeError {
    BlockprobeError::Blockprobe {
        message: format!("Failed to write report: {error}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
