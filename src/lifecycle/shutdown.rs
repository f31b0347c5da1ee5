//! Shutdown coordination for the checker.
//!
//! The monitor loop and the HTTP server each hold a receiver. A signal,
//! or the server stopping on its own, fires one `()` to all of them.

use tokio::sync::broadcast;

/// Cloneable handle: any clone may trigger, any clone may subscribe.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before spawning the task that waits on it; a receiver
    /// created after `trigger` never sees the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. A no-op when nobody is subscribed.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
