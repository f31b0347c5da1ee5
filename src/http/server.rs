//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the health handler on every path
//! - Wire up request tracing
//! - Serve until the shutdown signal

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::health::BackendState;

pub const AVAILABLE_BODY: &str = "OK";
pub const UNAVAILABLE_BODY: &str = "NOT OK";

/// HTTP server answering with the published backend state.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: Arc<BackendState>) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Any method, any path: one answer derived from `state`.
    pub fn build_router(state: Arc<BackendState>) -> Router {
        Router::new()
            .route("/", any(health_handler))
            .fallback(health_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Reads the current flag; never waits for a running cycle.
async fn health_handler(State(state): State<Arc<BackendState>>) -> Response {
    if state.read() {
        (StatusCode::OK, AVAILABLE_BODY).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, UNAVAILABLE_BODY).into_response()
    }
}
