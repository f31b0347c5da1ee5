//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (ini)
//!     → loader.rs (parse [config] and command sections)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//!     → settings and commands handed to each component at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Zero or missing numeric values fall back to defaults
//! - Section order in the file is the command evaluation order

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{Command, DatabaseSettings, ProbeConfig, Settings};
