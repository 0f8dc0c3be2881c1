//! Per-tube admission gate.
//!
//! # Responsibilities
//! - Cap concurrent handler invocations for one tube
//! - Hand out permits that release their slot on drop
//! - Report in-flight counts for diagnostics

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::observability::metrics;

/// Largest limit a gate accepts.
///
/// Bounded by what `Semaphore::acquire_many` can wait for at once.
pub const MAX_LIMIT: usize = if (u32::MAX as usize) < Semaphore::MAX_PERMITS {
    u32::MAX as usize
} else {
    Semaphore::MAX_PERMITS
};

/// A counting gate with `limit` slots.
///
/// Acquiring waits while every slot is taken. There is no ordering
/// guarantee among waiters and no timeout.
#[derive(Debug)]
pub struct AdmissionGate {
    tube: Arc<str>,
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl AdmissionGate {
    /// Create a gate for `tube`. A limit of zero is allowed and never admits.
    ///
    /// Callers must keep `limit <= MAX_LIMIT`.
    pub fn new(tube: impl Into<Arc<str>>, limit: usize) -> Self {
        Self {
            tube: tube.into(),
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> GatePermit {
        // The semaphore is never closed.
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("admission gate semaphore closed");

        metrics::in_flight_inc(&self.tube);

        GatePermit {
            tube: self.tube.clone(),
            _permit: permit,
        }
    }

    /// Take a free slot without waiting, if there is one.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        metrics::in_flight_inc(&self.tube);
        Some(GatePermit {
            tube: self.tube.clone(),
            _permit: permit,
        })
    }

    /// Wait until no slot is held.
    ///
    /// Returns as soon as the gate was observed empty; jobs admitted
    /// afterwards are not waited for.
    pub async fn wait_idle(&self) {
        // Bounded by MAX_LIMIT, so the cast is lossless.
        let all = self.limit as u32;
        let _all = self
            .semaphore
            .acquire_many(all)
            .await
            .expect("admission gate semaphore closed");
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> usize {
        self.limit.saturating_sub(self.available())
    }
}

/// One slot of an [`AdmissionGate`].
///
/// Dropping the permit frees the slot, so a handler task releases it on
/// every exit path, including a panic.
#[derive(Debug)]
pub struct GatePermit {
    tube: Arc<str>,
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    pub fn tube(&self) -> &str {
        &self.tube
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        metrics::in_flight_dec(&self.tube);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_gate_caps_permits() {
        let gate = AdmissionGate::new("emails", 2);
        let a = gate.acquire().await;
        let _b = gate.acquire().await;
        assert_eq!(gate.in_flight(), 2);
        assert!(gate.try_acquire().is_none());

        drop(a);
        assert_eq!(gate.in_flight(), 1);
        assert!(gate.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_zero_limit_never_admits() {
        let gate = AdmissionGate::new("paused", 0);
        assert!(gate.try_acquire().is_none());

        let waited = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(waited.is_err());

        // Nothing is in flight, so idle resolves immediately.
        tokio::time::timeout(Duration::from_millis(50), gate.wait_idle())
            .await
            .expect("idle on empty gate");
    }

    #[tokio::test]
    async fn test_wait_idle_waits_for_release() {
        let gate = Arc::new(AdmissionGate::new("emails", 3));
        let permit = gate.acquire().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.wait_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("idle after release")
            .unwrap();
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_permit_reports_tube() {
        let gate = AdmissionGate::new("sms", 1);
        let permit = gate.try_acquire().unwrap();
        assert_eq!(permit.tube(), "sms");
    }
}
