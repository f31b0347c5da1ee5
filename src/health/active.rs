//! Active backend checking.
//!
//! # Responsibilities
//! - Run the evaluator on a fixed interval
//! - Publish each finished cycle to the shared state
//! - Log state transitions, and only transitions

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::connector::Connector;
use crate::health::evaluator::CheckEvaluator;
use crate::health::state::BackendState;
use crate::observability::metrics;

/// A change of the published availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enabled,
    Disabled,
}

impl Transition {
    pub fn between(previous: bool, current: bool) -> Option<Self> {
        match (previous, current) {
            (false, true) => Some(Transition::Enabled),
            (true, false) => Some(Transition::Disabled),
            _ => None,
        }
    }
}

pub struct HealthMonitor<C> {
    evaluator: CheckEvaluator<C>,
    state: Arc<BackendState>,
    interval: Duration,
}

impl<C: Connector> HealthMonitor<C> {
    pub fn new(evaluator: CheckEvaluator<C>, state: Arc<BackendState>, interval: Duration) -> Self {
        Self {
            evaluator,
            state,
            interval,
        }
    }

    /// Tick until shutdown. The first cycle runs one interval after start.
    ///
    /// Cycles run inline in the loop, so they never overlap; ticks missed
    /// during a slow cycle collapse into one.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            commands = self.evaluator.commands().len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// Evaluate once and publish the result.
    pub async fn run_cycle(&self) -> Option<Transition> {
        let report = self.evaluator.evaluate().await;
        let available = report.available;
        metrics::record_cycle(available, report.duration);

        let previous = self.state.publish(report);
        let transition = Transition::between(previous, available);
        match transition {
            Some(Transition::Enabled) => {
                tracing::info!("Backend state changed: Backend enabled")
            }
            Some(Transition::Disabled) => {
                let failed: Vec<String> = self
                    .state
                    .last_report()
                    .map(|report| report.failed().map(|r| r.name.clone()).collect())
                    .unwrap_or_default();
                tracing::info!(failed = ?failed, "Backend state changed: Backend disabled")
            }
            None => {}
        }
        transition
    }
}
