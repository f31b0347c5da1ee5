//! Process-level errors. Each of these ends the process with status 1.

use std::net::SocketAddr;

use crate::config::ConfigError;
use crate::lifecycle::ModeConflict;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Mode(#[from] ModeConflict),

    #[error("can't load config file: {0}")]
    Config(#[from] ConfigError),

    #[error("can't listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}
