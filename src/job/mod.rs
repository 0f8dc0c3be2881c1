//! Job and handler abstractions.
//!
//! # Data Flow
//! ```text
//! job source (external collaborator)
//!     → Job { id, tube, body }
//!     → routing::Router::dispatch (resolve tube, admit)
//!     → Handler::work(job) in its own task
//! ```
//!
//! # Design Decisions
//! - A job is opaque to the router beyond its tube label
//! - Handlers are shared trait objects (`Arc<dyn Handler>`), never owned by a job
//! - Handlers do their own acknowledgement against the job source

pub mod handler;
pub mod types;

pub use handler::{Handler, HandlerError, HandlerFn};
pub use types::Job;
