//! mybckchk
//!
//! ```text
//!   ┌───────────┐ tick ┌────────────────┐ connect/ping/query ┌─────────┐
//!   │  monitor  │─────▶│   evaluator    │───────────────────▶│  MySQL  │
//!   └───────────┘      └───────┬────────┘                    └─────────┘
//!                              │ publish
//!                              ▼
//!                      ┌────────────────┐  read   ┌──────────────────┐
//!                      │ BackendState   │◀────────│ HTTP  200 / 500  │◀── load balancer
//!                      └────────────────┘         └──────────────────┘
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;

use mybckchk::cli::Cli;
use mybckchk::config::load_config;
use mybckchk::connector::MySqlConnector;
use mybckchk::lifecycle::signals;
use mybckchk::observability::logging;
use mybckchk::{AppError, Mode, Probe, Shutdown};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    let mode = Mode::select(cli.enable, cli.disable).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid mode flags");
    })?;

    let config = load_config(&cli.cfg).inspect_err(|e| {
        tracing::error!(path = %cli.cfg.display(), error = %e, "Can't load config file");
    })?;
    tracing::info!(
        path = %cli.cfg.display(),
        commands = config.commands.len(),
        "Configuration loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.settings.listen_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })
        .inspect_err(|e| tracing::error!(error = %e, "Bind failed"))?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        trigger.trigger();
    });

    let connector = MySqlConnector::new(&config.settings.database);
    Probe::new(mode, config, connector)
        .run(listener, shutdown)
        .await
        .map_err(AppError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
