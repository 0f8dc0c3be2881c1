//! Handlers shipped with the binary.

use async_trait::async_trait;
use std::time::Duration;

use crate::job::{Handler, HandlerError, Job};

/// Logs every job it receives, then sleeps for `delay` to stand in for work.
#[derive(Debug, Clone)]
pub struct LogHandler {
    name: String,
    delay: Duration,
}

impl LogHandler {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl Handler for LogHandler {
    async fn work(&self, job: Job) -> Result<(), HandlerError> {
        tracing::info!(
            handler = %self.name,
            tube = %job.tube(),
            job_id = %job.id,
            body = job.body_str().unwrap_or("<binary>"),
            "Processing job"
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

/// Accepts every job and does nothing with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

#[async_trait]
impl Handler for NoopHandler {
    async fn work(&self, _job: Job) -> Result<(), HandlerError> {
        Ok(())
    }
}
