pub mod client;
pub mod config;
pub mod session;
pub mod target;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Client(#[from] client::ProbeClientError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Target(#[from] target::TargetError),
}
