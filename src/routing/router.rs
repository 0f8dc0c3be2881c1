//! Tube lookup and bounded dispatch.
//!
//! # Responsibilities
//! - Store one registration (handler + gate) per tube
//! - Look up the handler for a tube, or report an explicit no-match
//! - Admit jobs through their tube's gate and run them in their own task
//!
//! # Design Decisions
//! - `DashMap` gives single-writer/multi-reader access per shard; the entry
//!   API makes the duplicate check and the insert one step
//! - Registrations are cloned out of the table before awaiting a permit,
//!   so no table lock is held across a suspension point
//! - Handler errors are logged and counted here, then dropped

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::TubeConfig;
use crate::handlers::HandlerSet;
use crate::job::{Handler, HandlerError, Job};
use crate::observability::metrics;
use crate::routing::error::RouterError;
use crate::routing::gate::{AdmissionGate, GatePermit, MAX_LIMIT};

struct Registration {
    handler: Arc<dyn Handler>,
    gate: AdmissionGate,
}

/// Point-in-time view of one tube's gate. Serialized by `--check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TubeStats {
    pub tube: String,
    pub limit: usize,
    pub in_flight: usize,
}

/// Routes jobs to the handler registered for their tube, with a
/// concurrency limit per tube.
///
/// Register every tube before dispatching jobs for it. Share the router
/// between tasks through an `Arc`.
pub struct Router {
    table: DashMap<String, Arc<Registration>>,
}

impl Router {
    /// Create a router with no tubes.
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Build a router from tube configuration, resolving handlers by name.
    pub fn from_config(tubes: &[TubeConfig], handlers: &HandlerSet) -> Result<Self, RouterError> {
        let router = Self::new();
        for tube in tubes {
            router.insert(tube.name.clone(), handlers.get(&tube.handler), tube.limit)?;
        }
        Ok(router)
    }

    /// Register `handler` for `tube`, allowing at most `limit` concurrent jobs.
    ///
    /// # Panics
    ///
    /// Panics if `tube` is empty, already registered, or `limit` exceeds
    /// [`MAX_LIMIT`]. Registration is a startup step; a failure means the
    /// process is wired wrong.
    pub fn register(&self, tube: impl Into<String>, handler: Arc<dyn Handler>, limit: usize) {
        if let Err(e) = self.try_register(tube, handler, limit) {
            panic!("{}", e);
        }
    }

    /// Like [`Router::register`], but returns the misconfiguration instead of panicking.
    pub fn try_register(
        &self,
        tube: impl Into<String>,
        handler: Arc<dyn Handler>,
        limit: usize,
    ) -> Result<(), RouterError> {
        self.insert(tube.into(), Some(handler), limit)
    }

    fn insert(
        &self,
        tube: String,
        handler: Option<Arc<dyn Handler>>,
        limit: usize,
    ) -> Result<(), RouterError> {
        if tube.is_empty() {
            return Err(RouterError::EmptyTube);
        }

        let Some(handler) = handler else {
            return Err(RouterError::MissingHandler { tube });
        };

        if limit > MAX_LIMIT {
            return Err(RouterError::LimitTooLarge {
                tube,
                limit,
                max: MAX_LIMIT,
            });
        }

        match self.table.entry(tube) {
            Entry::Occupied(entry) => Err(RouterError::DuplicateTube {
                tube: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                if limit == 0 {
                    tracing::warn!(tube = %entry.key(), "Tube registered with limit 0, its jobs will never run");
                }
                tracing::info!(tube = %entry.key(), limit, "Tube registered");

                let gate = AdmissionGate::new(entry.key().as_str(), limit);
                entry.insert(Arc::new(Registration { handler, gate }));
                Ok(())
            }
        }
    }

    /// The handler registered for `tube`, or `None`.
    pub fn handler(&self, tube: &str) -> Option<Arc<dyn Handler>> {
        self.table.get(tube).map(|r| r.handler.clone())
    }

    /// Registered tubes, in no particular order.
    pub fn tubes(&self) -> Vec<String> {
        self.table.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Gate usage per tube, in no particular order.
    pub fn stats(&self) -> Vec<TubeStats> {
        self.table
            .iter()
            .map(|r| TubeStats {
                tube: r.key().clone(),
                limit: r.gate.limit(),
                in_flight: r.gate.in_flight(),
            })
            .collect()
    }

    pub fn stats_for(&self, tube: &str) -> Option<TubeStats> {
        self.table.get(tube).map(|r| TubeStats {
            tube: tube.to_string(),
            limit: r.gate.limit(),
            in_flight: r.gate.in_flight(),
        })
    }

    /// Route `job` to its tube's handler and start it.
    ///
    /// Waits while the tube is at its limit, then spawns the handler and
    /// returns without waiting for it. The returned handle may be dropped.
    ///
    /// # Panics
    ///
    /// Panics if no handler is registered for the job's tube.
    pub async fn dispatch(&self, job: Job) -> JoinHandle<()> {
        match self.try_dispatch(job).await {
            Ok(handle) => handle,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`Router::dispatch`], but returns `UnknownTube` instead of panicking.
    pub async fn try_dispatch(&self, job: Job) -> Result<JoinHandle<()>, RouterError> {
        let registration = self
            .table
            .get(job.tube())
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| RouterError::UnknownTube {
                tube: job.tube().to_string(),
            })?;

        let started = Instant::now();
        let permit = registration.gate.acquire().await;
        metrics::record_dispatched(job.tube(), started.elapsed());

        tracing::debug!(
            tube = %job.tube(),
            job_id = %job.id,
            in_flight = registration.gate.in_flight(),
            "Job admitted"
        );

        let handler = registration.handler.clone();
        Ok(tokio::spawn(run_job(handler, permit, job)))
    }

    /// Wait until every tube has been observed with nothing in flight.
    ///
    /// Jobs dispatched while this is pending may still be running when it returns.
    pub async fn idle(&self) {
        let registrations: Vec<Arc<Registration>> =
            self.table.iter().map(|r| Arc::clone(r.value())).collect();

        for registration in registrations {
            registration.gate.wait_idle().await;
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("tubes", &self.stats())
            .finish()
    }
}

/// Body of the task spawned per admitted job. The permit lives until the
/// future is dropped, which tokio does even when the handler panics.
async fn run_job(handler: Arc<dyn Handler>, permit: GatePermit, job: Job) {
    let tube = permit.tube().to_string();
    let job_id = job.id;

    match handler.work(job).await {
        Ok(()) => {
            tracing::debug!(tube = %tube, job_id = %job_id, "Job finished");
            metrics::record_completed(&tube, true);
        }
        Err(e) => {
            tracing::warn!(tube = %tube, job_id = %job_id, error = %e, "Job handler failed");
            metrics::record_completed(&tube, false);
        }
    }

    drop(permit);
}

/// A router is itself a handler, so routers can be nested.
///
/// Unknown tubes come back as an error of the outer invocation instead of
/// a panic.
#[async_trait]
impl Handler for Router {
    async fn work(&self, job: Job) -> Result<(), HandlerError> {
        self.try_dispatch(job)
            .await
            .map(|_| ())
            .map_err(|e| HandlerError::Other(Box::new(e)))
    }
}
