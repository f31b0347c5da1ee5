//! Configuration schema definitions.
//!
//! These are the validated, immutable types handed to the rest of the
//! checker. The raw ini layout lives in `loader.rs`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_LISTEN_PORT: u16 = 9200;
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MYSQL_SOCKET: &str = "/var/run/mysqld/mysqld.sock";

/// Everything read from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ProbeConfig {
    /// Contents of the `[config]` section.
    pub settings: Settings,

    /// Every other named section, in file order.
    pub commands: Vec<Command>,
}

/// Checker settings from the `[config]` section.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where and how to reach the database.
    pub database: DatabaseSettings,

    /// Port the health endpoint listens on (all interfaces).
    pub listen_port: u16,

    /// Time between two evaluation cycles.
    pub check_interval: Duration,

    /// Upper bound for connect + ping + query of a single command.
    pub query_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            listen_port: DEFAULT_LISTEN_PORT,
            check_interval: Duration::from_millis(DEFAULT_CHECK_INTERVAL_MS),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

/// Database connection parameters.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// TCP host. `None` means connect through the local unix socket.
    pub host: Option<String>,

    /// TCP port, only used together with `host`.
    pub port: u16,

    pub user: String,
    pub password: String,

    /// Database selected after authentication.
    pub name: String,

    /// Unix socket path, only used when `host` is absent.
    pub socket: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_MYSQL_PORT,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            socket: PathBuf::from(DEFAULT_MYSQL_SOCKET),
        }
    }
}

impl DatabaseSettings {
    /// Printable connection target with the password masked.
    pub fn target(&self) -> ConnectionTarget<'_> {
        ConnectionTarget(self)
    }
}

/// Display helper for [`DatabaseSettings::target`].
pub struct ConnectionTarget<'a>(&'a DatabaseSettings);

impl fmt::Display for ConnectionTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let db = self.0;
        let password = if db.password.is_empty() { "" } else { "***" };
        match &db.host {
            Some(host) => write!(
                f,
                "{}:{}@tcp({}:{})/{}",
                db.user, password, host, db.port, db.name
            ),
            None => write!(
                f,
                "{}:{}@unix({})/{}",
                db.user,
                password,
                db.socket.display(),
                db.name
            ),
        }
    }
}

/// A single diagnostic check: a scalar query and the exact value it must return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Section name the command was declared under.
    pub name: String,
    pub query: String,
    pub expect: String,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        query: impl Into<String>,
        expect: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            expect: expect.into(),
        }
    }
}
