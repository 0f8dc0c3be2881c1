//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (tube, handler, limit)
//!     → router.rs (reject empty / missing / duplicate)
//!     → gate.rs (semaphore with `limit` permits)
//!     → insert into routing table
//!
//! Dispatch (per job):
//!     Job.tube
//!     → router.rs (table lookup, read guard only)
//!     → gate.rs (await a permit while the tube is saturated)
//!     → tokio::spawn(handler.work(job)), permit moved into the task
//!     → permit dropped when the task ends (ok, error or panic)
//! ```
//!
//! # Design Decisions
//! - One gate per tube, no lock shared between gates
//! - Registrations are never removed or replaced
//! - Misconfiguration is fatal: `register`/`dispatch` panic, `try_*` variants return `RouterError`
//! - No timeout on waiting for a permit; wrap `dispatch` if one is needed

pub mod error;
pub mod gate;
pub mod router;

pub use error::RouterError;
pub use gate::{AdmissionGate, GatePermit, MAX_LIMIT};
pub use router::{Router, TubeStats};
