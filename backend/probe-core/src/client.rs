use crate::DEFAULT_USER_AGENT;
use crate::error::client::ProbeClientError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use log::trace;
use reqwest::Client;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(10);

/// HTTP client that only cares about the status line of a response.
#[derive(Clone)]
pub struct ProbeClient {
    client: Client,
}

impl ProbeClient {
    #[track_caller]
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ProbeClientError> {
        let location = ErrorLocation::from(Location::caller());
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProbeClientError::Build {
                message: e.to_string(),
                location,
            })?;

        Ok(Self { client })
    }

    #[track_caller]
    pub fn with_defaults() -> Result<Self, ProbeClientError> {
        Self::new(DEFAULT_TIMEOUT_DURATION, DEFAULT_USER_AGENT)
    }

    /// Send a GET to `url` and return the response status.
    ///
    /// The body is never read. Any status, including 4xx and 5xx, is `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeClientError::Http`] when no response was received at all
    /// (DNS failure, refused connection, TLS failure, timeout).
    pub async fn fetch_status(&self, url: &str) -> Result<HttpStatusCode, ProbeClientError> {
        let response = self.client.get(url).send().await?;
        let status = HttpStatusCode::from(response.status().as_u16());

        trace!("GET {url} -> {status}");

        Ok(status)
    }
}
