use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TargetError {
    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unsupported Scheme Error: '{scheme}' (expected http or https) {location}")]
    UnsupportedScheme {
        scheme: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for TargetError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        TargetError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
