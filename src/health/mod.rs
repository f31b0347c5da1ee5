//! Backend health subsystem.
//!
//! # Data Flow
//! ```text
//! Active checks (active.rs):
//!     Periodic timer
//!     → evaluator.rs runs every command
//!     → state.rs publishes the cycle result
//!     → transition logged when the flag flips
//!
//! HTTP handlers:
//!     → state.rs read, never waiting on a running cycle
//! ```
//!
//! # Design Decisions
//! - One composite flag for the whole backend
//! - A cycle result is published only once the cycle has finished
//! - Failures are folded into the flag, never propagated

pub mod active;
pub mod evaluator;
pub mod state;

pub use active::{HealthMonitor, Transition};
pub use evaluator::{CheckEvaluator, CommandResult, CycleReport, Outcome};
pub use state::BackendState;
