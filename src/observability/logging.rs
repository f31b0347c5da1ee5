//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Map the `--debug` flag onto the default filter
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the flag
//! - Everything else passes `tracing` macros, no logger handle is threaded around

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "mybckchk=info,tower_http=info";
pub const DEBUG_FILTER: &str = "mybckchk=debug,tower_http=debug";

pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
