//! Tube router: concurrency-limited job dispatch by tube.

pub mod config;
pub mod handlers;
pub mod job;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod source;

pub use config::WorkerConfig;
pub use job::{Handler, HandlerError, HandlerFn, Job};
pub use routing::{Router, RouterError};
