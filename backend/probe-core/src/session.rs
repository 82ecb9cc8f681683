//! The probe loop.
//!
//! A session sends one GET at a time to `base_url + random_suffix` and writes
//! `<url>: <status>` for each response. It stops when:
//!
//! - `request_count` responses have been received,
//! - a blocking status (403 by default) comes back, or
//! - `max_connection_failures` requests in a row fail to get any response.
//!
//! Failed requests print `Connection error` and do not consume a request slot.
//! Retries after a failure are paced with an exponential backoff that resets on
//! the next successful response.

use crate::client::ProbeClient;
use crate::config::ProbeConfig;
use crate::error::session::SessionError;
use crate::report::{ProbeOutcome, ProbeReport};
use crate::suffix::SuffixGenerator;
use crate::target::ProbeTarget;

use common::http_status::FORBIDDEN;

use std::io::Write;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use log::{debug, info, trace, warn};
use rand::Rng;
use rand::rngs::StdRng;
use tokio::time::sleep as TokioSleep;

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub request_count: u64,
    pub max_connection_failures: u32,
    pub block_statuses: Vec<u16>,
    pub request_delay: Duration,
    pub retry_initial_interval: Duration,
    pub retry_max_interval: Duration,
}

impl SessionSettings {
    /// Settings with the stock limits: stop on 403, give up after 10
    /// consecutive connection errors, no delay between requests.
    pub fn new(request_count: u64) -> Self {
        Self::from_config(request_count, &ProbeConfig::default())
    }

    pub fn from_config(request_count: u64, config: &ProbeConfig) -> Self {
        Self {
            request_count,
            max_connection_failures: config.run.max_connection_failures,
            block_statuses: config.run.block_statuses.clone(),
            request_delay: config.run.delay(),
            retry_initial_interval: config.retry.initial_interval(),
            retry_max_interval: config.retry.max_interval(),
        }
    }

    fn is_blocking(&self, status: u16) -> bool {
        if self.block_statuses.is_empty() {
            return status == FORBIDDEN;
        }
        self.block_statuses.contains(&status)
    }
}

pub struct ProbeSession<R = StdRng> {
    client: ProbeClient,
    target: ProbeTarget,
    generator: SuffixGenerator<R>,
    settings: SessionSettings,
    started: Instant,
}

impl<R: Rng> ProbeSession<R> {
    /// Create a session. The block timer starts now unless overridden with
    /// [`ProbeSession::started_at`].
    pub fn new(
        client: ProbeClient,
        target: ProbeTarget,
        generator: SuffixGenerator<R>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            client,
            target,
            generator,
            settings,
            started: Instant::now(),
        }
    }

    /// Measure the time-to-block from `started` instead of session creation.
    pub fn started_at(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    fn retry_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.settings.retry_initial_interval,
            current_interval: self.settings.retry_initial_interval,
            max_interval: self.settings.retry_max_interval,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Run the probe loop, writing one line per event to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Output`] if writing to `out` fails. Network
    /// failures are never errors; they are reported through the outcome.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<ProbeReport, SessionError> {
        let mut report = ProbeReport::default();
        let mut backoff = self.retry_backoff();
        let mut consecutive_failures: u32 = 0;

        info!(
            "Probing {} with {} requests (suffix length {})",
            self.target.base_url(),
            self.settings.request_count,
            self.generator.length()
        );

        while report.requests_sent < self.settings.request_count {
            let suffix = self.generator.generate();
            let url = self.target.url_for(&suffix);

            let status = match self.client.fetch_status(&url).await {
                Ok(status) => status,
                Err(e) => {
                    debug!("Request to {url} failed: {e}");
                    writeln!(out, "{CONNECTION_ERROR_MESSAGE}")?;
                    report.record_connection_error();
                    consecutive_failures += 1;

                    if consecutive_failures >= self.settings.max_connection_failures {
                        warn!("Giving up after {consecutive_failures} consecutive connection errors");
                        return Ok(report.finish(
                            ProbeOutcome::GaveUp {
                                consecutive_failures,
                            },
                            self.started.elapsed(),
                        ));
                    }

                    if let Some(duration) = backoff.next_backoff() {
                        trace!("Retrying after {duration:?}");
                        TokioSleep(duration).await;
                    }
                    continue;
                }
            };

            if consecutive_failures > 0 {
                debug!("Connection recovered after {consecutive_failures} failures");
                consecutive_failures = 0;
                backoff.reset();
            }

            writeln!(out, "{url}: {status}")?;
            report.record(status);

            if self.settings.is_blocking(status.as_u16()) {
                let after_secs = self.started.elapsed().as_secs();
                writeln!(out, "We were blocked in {after_secs} seconds!")?;
                info!(
                    "Blocked with {status} after {} requests",
                    report.requests_sent
                );
                return Ok(report.finish(
                    ProbeOutcome::Blocked { status, after_secs },
                    self.started.elapsed(),
                ));
            }

            if !self.settings.request_delay.is_zero()
                && report.requests_sent < self.settings.request_count
            {
                TokioSleep(self.settings.request_delay).await;
            }
        }

        info!(
            "Completed {} requests without being blocked",
            report.requests_sent
        );
        Ok(report.finish(ProbeOutcome::Completed, self.started.elapsed()))
    }
}
