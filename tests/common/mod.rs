//! Shared utilities for dispatch and load testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use tube_router::{Handler, HandlerError, HandlerFn, Job};

/// Handler that records how many invocations overlap.
#[derive(Debug, Default)]
pub struct Tracker {
    current: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    completed: AtomicUsize,
    delay: Duration,
}

impl Tracker {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Default::default()
        })
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Poll until `n` invocations completed or `timeout` passes.
    pub async fn wait_completed(&self, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.completed() < n {
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}

#[async_trait]
impl Handler for Tracker {
    async fn work(&self, _job: Job) -> Result<(), HandlerError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.current.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A handler whose jobs stay running until the returned sender sends `true`.
#[allow(dead_code)]
pub fn held_handler() -> (watch::Sender<bool>, Arc<dyn Handler>) {
    let (release_tx, release_rx) = watch::channel(false);
    let handler = HandlerFn::shared(move |_job: Job| {
        let mut release = release_rx.clone();
        async move {
            let _ = release.wait_for(|go| *go).await;
            Ok(())
        }
    });
    (release_tx, handler)
}
