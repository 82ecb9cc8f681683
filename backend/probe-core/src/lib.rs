pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod suffix;
pub mod target;

#[cfg(test)]
mod tests;

pub const BLOCKPROBE_NAME: &str = "blockprobe";
pub const BLOCKPROBE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_USER_AGENT: &str =
    const_format::concatcp!(BLOCKPROBE_NAME, "/", BLOCKPROBE_VERSION);
