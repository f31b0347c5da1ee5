//! MySQL backend availability checker.
//!
//! Runs a list of scalar queries against the database on a fixed interval,
//! folds their outcomes into one "backend available" flag and serves that
//! flag on a single HTTP endpoint for load balancers.

pub mod cli;
pub mod config;
pub mod connector;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ProbeConfig;
pub use error::AppError;
pub use health::BackendState;
pub use http::HttpServer;
pub use lifecycle::{Mode, Probe, Shutdown};
