//! Metrics collection.
//!
//! # Metrics
//! - `mybckchk_checks_total` (counter): command outcomes by `outcome`
//! - `mybckchk_cycles_total` (counter): completed evaluation cycles
//! - `mybckchk_cycle_duration_seconds` (histogram): time per cycle
//! - `mybckchk_backend_available` (gauge): 1=available, 0=not available
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade only; no exporter endpoint is
//!   bound here, the health endpoint stays the single listener
//! - Without an installed recorder every call is a no-op

use std::time::Duration;

pub fn record_check(outcome: &'static str) {
    metrics::counter!("mybckchk_checks_total", "outcome" => outcome).increment(1);
}

pub fn record_cycle(available: bool, duration: Duration) {
    metrics::counter!("mybckchk_cycles_total").increment(1);
    metrics::histogram!("mybckchk_cycle_duration_seconds").record(duration.as_secs_f64());
    record_availability(available);
}

pub fn record_availability(available: bool) {
    metrics::gauge!("mybckchk_backend_available").set(if available { 1.0 } else { 0.0 });
}
