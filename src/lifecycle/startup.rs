//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the reporting mode from the command-line flags
//! - Initialize the shared state for that mode
//! - Start the health monitor (active mode only), then the HTTP server
//!
//! # Design Decisions
//! - Fail fast: a mode conflict is fatal before anything binds
//! - Static modes never touch the database

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ProbeConfig;
use crate::connector::Connector;
use crate::health::{BackendState, CheckEvaluator, HealthMonitor};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// How the published state is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Always available, no checks run.
    ForceEnabled,
    /// Always unavailable, no checks run.
    ForceDisabled,
    /// State follows the periodic checks.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("--enable and --disable can't be used together")]
pub struct ModeConflict;

impl Mode {
    pub fn select(enable: bool, disable: bool) -> Result<Self, ModeConflict> {
        match (enable, disable) {
            (true, true) => Err(ModeConflict),
            (true, false) => Ok(Mode::ForceEnabled),
            (false, true) => Ok(Mode::ForceDisabled),
            (false, false) => Ok(Mode::Active),
        }
    }

    /// State published before (or instead of) the first cycle.
    pub fn initial_state(self) -> bool {
        self == Mode::ForceEnabled
    }
}

/// A fully configured checker, ready to serve.
pub struct Probe<C> {
    mode: Mode,
    config: ProbeConfig,
    connector: C,
}

impl<C: Connector + 'static> Probe<C> {
    pub fn new(mode: Mode, config: ProbeConfig, connector: C) -> Self {
        Self {
            mode,
            config,
            connector,
        }
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let Probe {
            mode,
            config,
            connector,
        } = self;

        let state = Arc::new(BackendState::new(mode.initial_state()));
        metrics::record_availability(state.read());

        let monitor = match mode {
            Mode::ForceEnabled => {
                tracing::info!("Always reporting available backend");
                None
            }
            Mode::ForceDisabled => {
                tracing::info!("Always reporting unavailable backend");
                None
            }
            Mode::Active => {
                if config.commands.is_empty() {
                    tracing::warn!(
                        "No commands configured, every cycle will report the backend available"
                    );
                }
                let evaluator = CheckEvaluator::new(
                    connector,
                    config.commands,
                    config.settings.query_timeout,
                );
                let monitor =
                    HealthMonitor::new(evaluator, state.clone(), config.settings.check_interval);
                Some(tokio::spawn(monitor.run(shutdown.subscribe())))
            }
        };

        let result = HttpServer::new(state)
            .run(listener, shutdown.subscribe())
            .await;

        // The server may also stop on an I/O error; take the monitor down with it.
        shutdown.trigger();
        if let Some(task) = monitor {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health monitor task failed");
            }
        }
        result
    }
}
