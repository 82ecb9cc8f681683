use probe_core::error::CoreError;
use probe_core::error::client::ProbeClientError;
use probe_core::error::config::ConfigError;
use probe_core::error::session::SessionError;
use probe_core::error::target::TargetError;

use common::ErrorLocation;

use thiserror::Error;

/// Errors that end the blockprobe binary with a failure exit status.
#[derive(Debug, Error)]
pub enum BlockprobeError {
    /// Error from this app (logging, output formatting)
    #[error("Blockprobe Error: {message} {location}")]
    Blockprobe {
        message: String,
        location: ErrorLocation,
    },

    /// Error from probe-core (config, target, client, session)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ConfigError> for BlockprobeError {
    fn from(error: ConfigError) -> Self {
        BlockprobeError::Core(error.into())
    }
}

impl From<TargetError> for BlockprobeError {
    fn from(error: TargetError) -> Self {
        BlockprobeError::Core(error.into())
    }
}

impl From<ProbeClientError> for BlockprobeError {
    fn from(error: ProbeClientError) -> Self {
        BlockprobeError::Core(error.into())
    }
}

impl From<SessionError> for BlockprobeError {
    fn from(error: SessionError) -> Self {
        BlockprobeError::Core(error.into())
    }
}
