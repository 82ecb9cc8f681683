//! Shared building blocks for blockprobe.
//!
//! Kept free of HTTP and runtime dependencies so every crate in the
//! workspace can use it:
//!
//! - **common** (this crate): error locations and status-code helpers
//! - **probe-core**: the probe session and everything it needs
//! - **blockprobe**: the command-line binary wiring it together

pub mod error;
pub mod http_status;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
