//! MySQL connector built on `mysql_async`.

use async_trait::async_trait;
use mysql_async::{prelude::*, Conn, Opts, OptsBuilder, Row, Value};

use crate::config::DatabaseSettings;
use crate::connector::{Connector, ConnectorError};

/// Opens one connection per call from fixed options.
///
/// Host absent means the unix socket from the settings, host present
/// means TCP to `host:port`.
pub struct MySqlConnector {
    opts: Opts,
}

impl MySqlConnector {
    pub fn new(settings: &DatabaseSettings) -> Self {
        tracing::debug!(target_db = %settings.target(), "MySQL connection target");
        Self {
            opts: build_opts(settings).into(),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

fn build_opts(settings: &DatabaseSettings) -> OptsBuilder {
    let builder = OptsBuilder::default()
        .user(non_empty(&settings.user))
        .pass(non_empty(&settings.password))
        .db_name(non_empty(&settings.name));

    match &settings.host {
        Some(host) => builder
            .ip_or_hostname(host.as_str())
            .tcp_port(settings.port)
            .prefer_socket(false),
        None => builder.socket(Some(settings.socket.to_string_lossy())),
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = Conn;

    async fn connect(&self) -> Result<Conn, ConnectorError> {
        Conn::new(self.opts.clone())
            .await
            .map_err(|e| ConnectorError::Connect(e.into()))
    }

    async fn ping(&self, conn: &mut Conn) -> Result<(), ConnectorError> {
        conn.ping().await.map_err(|e| ConnectorError::Ping(e.into()))
    }

    async fn run_scalar(&self, conn: &mut Conn, query: &str) -> Result<String, ConnectorError> {
        let row: Option<Row> = conn
            .query_first(query)
            .await
            .map_err(|e| ConnectorError::Query(e.into()))?;

        let value: Value = row
            .and_then(|mut row| row.take(0))
            .ok_or(ConnectorError::NoRows)?;
        scalar_to_string(value)
    }

    async fn close(&self, conn: Conn) {
        if let Err(e) = conn.disconnect().await {
            tracing::debug!(error = %e, "MySQL disconnect failed");
        }
    }
}

/// Render a column value the way it reads in the mysql client.
fn scalar_to_string(value: Value) -> Result<String, ConnectorError> {
    match value {
        Value::NULL => Err(ConnectorError::NullValue),
        Value::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Int(v) => Ok(v.to_string()),
        Value::UInt(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(v.to_string()),
        Value::Double(v) => Ok(v.to_string()),
        other => Ok(other.as_sql(true).trim_matches('\'').to_string()),
    }
}
