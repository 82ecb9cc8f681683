//! The base URL under test.

use crate::error::target::TargetError;

use common::ErrorLocation;

use std::panic::Location;

use url::Url;

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// A validated base URL that suffixes are appended to.
///
/// The original string is kept as typed. Suffixes are concatenated onto it
/// without any path joining, so `http://host/a` probes `http://host/a<suffix>`
/// and `http://host/a/` probes `http://host/a/<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    base_url: String,
}

impl ProbeTarget {
    /// Validate `base_url` as an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::UrlParse`] if the URL does not parse and
    /// [`TargetError::UnsupportedScheme`] for anything other than http/https.
    #[track_caller]
    pub fn parse(base_url: &str) -> Result<Self, TargetError> {
        let parsed = Url::parse(base_url)?;

        if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
            return Err(TargetError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.base_url)
    }
}
