use crate::BLOCKPROBE_NAME;
use crate::DEFAULT_USER_AGENT;
use crate::error::config::ConfigError;
use crate::suffix::DEFAULT_SUFFIX_LENGTH;

use common::ErrorLocation;
use common::http_status::FORBIDDEN;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";
const MIN_STATUS_CODE: u16 = 100;
const MAX_STATUS_CODE: u16 = 599;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: None,
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    #[serde(default = "default_suffix_length")]
    pub suffix_length: usize,
    #[serde(default = "default_max_connection_failures")]
    pub max_connection_failures: u32,
    #[serde(default = "default_block_statuses")]
    pub block_statuses: Vec<u16>,
    #[serde(default)]
    pub delay_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            suffix_length: default_suffix_length(),
            max_connection_failures: default_max_connection_failures(),
            block_statuses: default_block_statuses(),
            delay_ms: 0,
        }
    }
}

impl RunConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
        }
    }
}

impl RetryConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeConfig {
    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_timeout_ms() -> u64 {
    10_000
}
fn default_suffix_length() -> usize {
    DEFAULT_SUFFIX_LENGTH
}
fn default_max_connection_failures() -> u32 {
    10
}
fn default_block_statuses() -> Vec<u16> {
    vec![FORBIDDEN]
}
fn default_initial_interval_ms() -> u64 {
    500
}
fn default_max_interval_ms() -> u64 {
    10_000
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ProbeConfig {
    /// Default config location: `{config_dir}/blockprobe/config.toml`.
    ///
    /// Returns `None` on platforms without a user config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(BLOCKPROBE_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the probe configuration.
    ///
    /// With an explicit path the file must exist and be valid. Without one,
    /// the default location is tried and defaults are used if nothing is there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing, or if any file
    /// that is found cannot be read, parsed, or validated.
    #[track_caller]
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    location: ErrorLocation::from(Location::caller()),
                    path: path.to_path_buf(),
                });
            }
            return Self::load_from_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("No user config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path.
    #[track_caller]
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let location = ErrorLocation::from(Location::caller());

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location,
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ProbeConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location,
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        config.validate()?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is out of range.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request.timeout_ms == 0 {
            return Err(validation_error("request.timeout_ms must be greater than 0"));
        }

        if self.run.suffix_length == 0 {
            return Err(validation_error("run.suffix_length must be greater than 0"));
        }

        if self.run.max_connection_failures == 0 {
            return Err(validation_error(
                "run.max_connection_failures must be greater than 0",
            ));
        }

        if self.run.block_statuses.is_empty() {
            return Err(validation_error("run.block_statuses cannot be empty"));
        }

        if let Some(status) = self
            .run
            .block_statuses
            .iter()
            .find(|s| !(MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(*s))
        {
            return Err(validation_error(format!(
                "Invalid block status: {status} (must be {MIN_STATUS_CODE}-{MAX_STATUS_CODE})"
            )));
        }

        if self.retry.initial_interval_ms > self.retry.max_interval_ms {
            return Err(validation_error(format!(
                "retry.initial_interval_ms ({}) exceeds retry.max_interval_ms ({})",
                self.retry.initial_interval_ms, self.retry.max_interval_ms
            )));
        }

        Ok(())
    }
}

#[track_caller]
fn validation_error(reason: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: reason.into(),
    }
}
