//! HTTP status code helpers for classifying probe responses.

use serde::Serialize;

/// Status code with the HTTP 403 Forbidden value.
pub const FORBIDDEN: u16 = 403;

/// HTTP status code as returned by the probed server.
///
/// Stored as the raw number so unknown or non-standard codes survive intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub fn is_forbidden(&self) -> bool {
        self.0 == FORBIDDEN
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
