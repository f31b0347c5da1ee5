//! HTTP exposition of the backend state.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum, request tracing)
//!     → health handler reads health::BackendState
//!     → 200 "OK" / 500 "NOT OK"
//! ```

pub mod server;

pub use server::HttpServer;
