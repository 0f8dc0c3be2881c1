//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl-C)
//! - Translate the first one into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Once Tokio listens for SIGINT the default handler no longer runs, so a
//!   second Ctrl-C forces exit here instead of waiting for the drain

use crate::lifecycle::Shutdown;

/// Exit status used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Trigger `shutdown` on the first Ctrl-C, exit the process on the second.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for interrupt");
        return;
    }
    tracing::info!("Interrupt received, shutting down");
    shutdown.trigger();

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("Second interrupt received, exiting without draining");
            std::process::exit(FORCED_EXIT_CODE);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for interrupt");
        }
    }
}
