//! Dispatch loop between a job source and the router.
//!
//! # Responsibilities
//! - Read jobs until end of input or shutdown
//! - Dispatch each job, giving up on a job still waiting for a slot when
//!   shutdown is triggered
//!
//! # Design Decisions
//! - Waiting for a slot is raced against shutdown; the acquire is cancel
//!   safe, so an abandoned wait admits nothing and leaks nothing
//! - An unknown tube stops the loop with an error

use tokio::io::AsyncBufRead;

use crate::lifecycle::Shutdown;
use crate::routing::{Router, RouterError};
use crate::source::LineSource;

/// Why the dispatch loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    /// The source has no more jobs.
    EndOfInput,
    /// Shutdown was triggered.
    Shutdown,
}

/// Feed jobs from `source` into `router` until input ends or `shutdown` fires.
///
/// Only triggers sent after this call starts are observed.
pub async fn run<R>(
    source: &mut LineSource<R>,
    router: &Router,
    shutdown: &Shutdown,
) -> Result<Stopped, RouterError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stop = shutdown.subscribe();

    loop {
        let next = tokio::select! {
            _ = stop.recv() => return Ok(Stopped::Shutdown),
            next = source.next_job() => next,
        };

        let job = match next {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::info!(lines = source.lines_read(), "End of input");
                return Ok(Stopped::EndOfInput);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable job");
                continue;
            }
        };

        let tube = job.tube().to_string();
        let job_id = job.id;
        tokio::select! {
            _ = stop.recv() => {
                tracing::warn!(tube = %tube, job_id = %job_id, "Shutdown while waiting for a slot, job not dispatched");
                return Ok(Stopped::Shutdown);
            }
            dispatched = router.try_dispatch(job) => {
                // An unknown tube means the job source and config disagree.
                if let Err(e) = dispatched {
                    tracing::error!(error = %e, "Job for unregistered tube");
                    return Err(e);
                }
            }
        }
    }
}
