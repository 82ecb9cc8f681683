use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ProbeClientError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Client Build Error: {message} {location}")]
    Build {
        message: String,
        location: ErrorLocation,
    },
}

impl From<reqwest::Error> for ProbeClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ProbeClientError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
