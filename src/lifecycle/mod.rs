//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build handlers → Register tubes
//!
//! Run (run.rs):
//!     Read job → Dispatch (raced against shutdown) → repeat until end of input
//!
//! Shutdown (shutdown.rs):
//!     Signal or end of input → Stop reading jobs → Drain in-flight jobs → Exit
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) → Trigger graceful shutdown
//!     Second SIGINT → Exit immediately
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then handlers, then the router
//! - Fail fast: any registration error is fatal
//! - Drain has a timeout: forced exit after the deadline

pub mod run;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use run::{run, Stopped};
pub use shutdown::Shutdown;
