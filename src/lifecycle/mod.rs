//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Flags → Mode → initial state → monitor (active only) → HTTP server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → monitor loop exits, server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Mode, ModeConflict, Probe};
