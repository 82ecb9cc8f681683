//! Command-line arguments.

use probe_core::config::ProbeConfig;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "blockprobe", version)]
#[command(about = "Generates and requests random URLs until the target blocks them")]
pub struct Cli {
    /// Base URL for testing; the random suffix is appended verbatim
    #[arg(short = 'u', long = "base_url", value_name = "URL")]
    pub base_url: String,

    /// Number of requests to send (connection errors do not count)
    #[arg(
        short = 'c',
        long = "request_count",
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_count: u64,

    /// Config file (default: <config dir>/blockprobe/config.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-request timeout, e.g. "5s" or "750ms"
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Pause between successful requests, e.g. "200ms"
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub delay: Option<Duration>,

    /// Length of the random suffix
    #[arg(long, value_name = "N")]
    pub suffix_length: Option<usize>,

    /// Stop after this many connection errors in a row
    #[arg(long, value_name = "N")]
    pub max_connection_failures: Option<u32>,

    /// Status that counts as blocked; repeat for several (default: 403)
    #[arg(
        long = "block-status",
        value_name = "CODE",
        value_parser = clap::value_parser!(u16).range(100..600)
    )]
    pub block_statuses: Vec<u16>,

    /// Print a status-code tally when the run ends
    #[arg(long)]
    pub summary: bool,

    /// Print the run report as JSON when the run ends
    #[arg(long, conflicts_with = "summary")]
    pub json: bool,

    /// Also write logs to <DIR>/blockprobe.log
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Overwrite config-file values with any flags given on the command line.
    pub fn apply_overrides(&self, config: &mut ProbeConfig) {
        if let Some(timeout) = self.timeout {
            config.request.timeout_ms = duration_to_millis(timeout);
        }
        if let Some(delay) = self.delay {
            config.run.delay_ms = duration_to_millis(delay);
        }
        if let Some(length) = self.suffix_length {
            config.run.suffix_length = length;
        }
        if let Some(max) = self.max_connection_failures {
            config.run.max_connection_failures = max;
        }
        if !self.block_statuses.is_empty() {
            config.run.block_statuses = self.block_statuses.clone();
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
