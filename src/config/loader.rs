//! Configuration loading from disk.
//!
//! The file is read with `rust-ini` so section names and values reach the
//! checker exactly as written: dots stay part of the name and backslashes
//! are not escapes. Typed `[config]` values go through `config` + serde.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, ParseOption, Properties};
use serde::Deserialize;

use crate::config::schema::{
    Command, DatabaseSettings, ProbeConfig, Settings, DEFAULT_CHECK_INTERVAL_MS,
    DEFAULT_LISTEN_PORT, DEFAULT_MYSQL_PORT, DEFAULT_MYSQL_SOCKET, DEFAULT_QUERY_TIMEOUT_MS,
};
use crate::config::validation::{validate_config, ValidationError};

/// Name of the section holding checker settings.
pub const SETTINGS_SECTION: &str = "config";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("can't read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ini syntax error at {0}")]
    Syntax(#[from] ini::ParseError),

    #[error("parse error: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("missing [config] section")]
    MissingSettings,

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[config]` as written in the file. Zero numbers mean "use the default".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    mysql_host: Option<String>,
    mysql_user: String,
    mysql_password: String,
    mysql_port: u16,
    mysql_db: String,
    mysql_socket: Option<String>,
    listen: u16,
    check_interval: u64,
    query_timeout: u64,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let host = raw.mysql_host.filter(|h| !h.trim().is_empty());
        let socket = raw
            .mysql_socket
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MYSQL_SOCKET.to_string());

        Self {
            database: DatabaseSettings {
                host,
                port: or_default(raw.mysql_port, DEFAULT_MYSQL_PORT),
                user: raw.mysql_user,
                password: raw.mysql_password,
                name: raw.mysql_db,
                socket: PathBuf::from(socket),
            },
            listen_port: or_default(raw.listen, DEFAULT_LISTEN_PORT),
            check_interval: Duration::from_millis(or_default(
                raw.check_interval,
                DEFAULT_CHECK_INTERVAL_MS,
            )),
            query_timeout: Duration::from_millis(or_default(
                raw.query_timeout,
                DEFAULT_QUERY_TIMEOUT_MS,
            )),
        }
    }
}

fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}

/// Load and validate configuration from an ini file.
pub fn load_config(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse and validate ini text.
///
/// `[config]` holds the settings; every other named section is a command,
/// kept in file order. Keys outside any section are ignored.
pub fn parse_config(content: &str) -> Result<ProbeConfig, ConfigError> {
    let options = ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(content, options)?;

    let mut settings = None;
    let mut commands = Vec::new();

    for (section, props) in ini.iter() {
        match section {
            None => {
                if !props.is_empty() {
                    tracing::debug!(keys = props.len(), "Ignoring keys outside of any section");
                }
            }
            Some(SETTINGS_SECTION) => settings = Some(parse_settings(props)?),
            Some(name) => commands.push(Command::new(
                name,
                props.get("query").unwrap_or_default(),
                props.get("expect").unwrap_or_default(),
            )),
        }
    }

    let config = ProbeConfig {
        settings: settings.ok_or(ConfigError::MissingSettings)?,
        commands,
    };
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        target_db = %config.settings.database.target(),
        commands = config.commands.len(),
        "Config loaded"
    );
    Ok(config)
}

fn parse_settings(props: &Properties) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();
    for (key, value) in props.iter() {
        builder = builder.set_override(key, value)?;
    }
    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Ok(Settings::from(raw))
}
