use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for SessionError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        SessionError::Output {
            message: String::from("Failed to write probe output"),
            location: ErrorLocation::from(Location::caller()),
            source: error,
        }
    }
}
