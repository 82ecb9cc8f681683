//! Results of a probe session.

use common::HttpStatusCode;

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::time::Duration;

use serde::Serialize;

/// Why a probe session stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Every requested probe got a response and none was blocking.
    #[default]
    Completed,
    /// The target answered with a blocking status.
    Blocked {
        status: HttpStatusCode,
        after_secs: u64,
    },
    /// Too many connection errors in a row.
    GaveUp { consecutive_failures: u32 },
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Completed => write!(f, "completed"),
            ProbeOutcome::Blocked { status, after_secs } => {
                write!(f, "blocked ({status}) after {after_secs} seconds")
            }
            ProbeOutcome::GaveUp {
                consecutive_failures,
            } => write!(
                f,
                "gave up after {consecutive_failures} consecutive connection errors"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub requests_sent: u64,
    pub connection_errors: u64,
    pub status_counts: BTreeMap<u16, u64>,
    pub elapsed_ms: u64,
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    /// Count a response. Each response consumes one request slot.
    pub fn record(&mut self, status: HttpStatusCode) {
        self.requests_sent += 1;
        *self.status_counts.entry(status.as_u16()).or_insert(0) += 1;
    }

    pub fn record_connection_error(&mut self) {
        self.connection_errors += 1;
    }

    pub fn finish(mut self, outcome: ProbeOutcome, elapsed: Duration) -> Self {
        self.outcome = outcome;
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn count_for(&self, status: u16) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Blocked { .. })
    }

    /// Write a human-readable tally of the session.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Requests sent: {}", self.requests_sent)?;
        writeln!(out, "Connection errors: {}", self.connection_errors)?;
        writeln!(out, "Status counts:")?;
        for (status, count) in &self.status_counts {
            writeln!(out, "  {status}: {count}")?;
        }
        writeln!(out, "Outcome: {}", self.outcome)
    }
}
