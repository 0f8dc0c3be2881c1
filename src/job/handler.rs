//! The capability of processing a job.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::job::Job;

/// Failure reported by a handler for a single job.
///
/// The router logs and counts these; it never retries.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        HandlerError::Message(message.into())
    }
}

/// Something that can process a job.
///
/// Implementations are shared between concurrent invocations, so `work`
/// takes `&self`. Acknowledging the job against its source is the
/// handler's business.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn work(&self, job: Job) -> Result<(), HandlerError>;
}

/// Adapts an async closure into a [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wrap the closure straight into a shareable trait object.
    pub fn shared(f: F) -> Arc<dyn Handler> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn work(&self, job: Job) -> Result<(), HandlerError> {
        (self.f)(job).await
    }
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
