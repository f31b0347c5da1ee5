//! Database access used by the check evaluator.
//!
//! # Responsibilities
//! - Open a fresh connection to the backend
//! - Ping it and run scalar queries
//! - Report every failure as a [`ConnectorError`], never panic
//!
//! The evaluator is generic over [`Connector`] so tests can script
//! database behaviour without a server.

pub mod mysql;

use std::time::Duration;

use async_trait::async_trait;

pub use mysql::MySqlConnector;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("connect failed: {0}")]
    Connect(#[source] BoxError),

    #[error("ping failed: {0}")]
    Ping(#[source] BoxError),

    #[error("query failed: {0}")]
    Query(#[source] BoxError),

    #[error("query returned no rows")]
    NoRows,

    #[error("query returned NULL")]
    NullValue,

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Send;

    async fn connect(&self) -> Result<Self::Connection, ConnectorError>;

    async fn ping(&self, conn: &mut Self::Connection) -> Result<(), ConnectorError>;

    /// Run `query` and return the first column of its first row as text.
    async fn run_scalar(
        &self,
        conn: &mut Self::Connection,
        query: &str,
    ) -> Result<String, ConnectorError>;

    /// Release the connection. Dropping it is enough by default.
    async fn close(&self, conn: Self::Connection) {
        drop(conn);
    }
}
