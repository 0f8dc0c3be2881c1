//! Shutdown coordination for the worker.

use std::time::Duration;
use tokio::sync::broadcast;

use crate::routing::Router;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for in-flight jobs, giving up after `timeout`.
///
/// Returns `false` if jobs were still running at the deadline.
pub async fn drain(router: &Router, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, router.idle()).await {
        Ok(()) => {
            tracing::info!("All in-flight jobs finished");
            true
        }
        Err(_) => {
            for stats in router.stats().into_iter().filter(|s| s.in_flight > 0) {
                tracing::warn!(
                    tube = %stats.tube,
                    in_flight = stats.in_flight,
                    "Jobs still running at drain deadline"
                );
            }
            false
        }
    }
}
