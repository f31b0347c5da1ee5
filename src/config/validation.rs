//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every command must carry a query
//! - Durations must be non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::ProbeConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Command section without a `query` key (or with a blank one).
    EmptyQuery(String),
    /// `check_interval` resolved to zero.
    ZeroInterval,
    /// `query_timeout` resolved to zero.
    ZeroTimeout,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyQuery(name) => write!(f, "command [{}] has no query", name),
            ValidationError::ZeroInterval => write!(f, "check_interval must be positive"),
            ValidationError::ZeroTimeout => write!(f, "query_timeout must be positive"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.settings.check_interval.is_zero() {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.settings.query_timeout.is_zero() {
        errors.push(ValidationError::ZeroTimeout);
    }

    errors.extend(
        config
            .commands
            .iter()
            .filter(|c| c.query.trim().is_empty())
            .map(|c| ValidationError::EmptyQuery(c.name.clone())),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
