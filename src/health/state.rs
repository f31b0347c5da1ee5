//! Published backend state.
//!
//! # States
//! - Available: health endpoint answers 200
//! - Not available: health endpoint answers 500
//!
//! # Design Decisions
//! - Single writer (the monitor), any number of readers (request handlers)
//! - The flag is an `AtomicBool`; the previous value comes from the same
//!   `swap` that publishes the new one
//! - The last cycle report is swapped in whole through `ArcSwapOption`, so a
//!   reader sees either the old report or the new one

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::health::evaluator::CycleReport;

#[derive(Debug)]
pub struct BackendState {
    available: AtomicBool,
    last_report: ArcSwapOption<CycleReport>,
}

impl BackendState {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            last_report: ArcSwapOption::empty(),
        }
    }

    /// Current value, as of the last completed write.
    pub fn read(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    pub fn write(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Store `available` and return the value it replaced.
    pub fn swap_and_get_previous(&self, available: bool) -> bool {
        self.available.swap(available, Ordering::AcqRel)
    }

    /// Publish a finished cycle. Returns the previous availability.
    ///
    /// The report goes in first so that a reader seeing the new flag can
    /// also see the report that produced it.
    pub fn publish(&self, report: CycleReport) -> bool {
        let available = report.available;
        self.last_report.store(Some(Arc::new(report)));
        self.swap_and_get_previous(available)
    }

    /// Report of the most recently completed cycle, if any ran.
    pub fn last_report(&self) -> Option<Arc<CycleReport>> {
        self.last_report.load_full()
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new(false)
    }
}
