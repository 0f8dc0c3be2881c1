//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing + handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms per tube)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Job id and tube flow through every log event for a job
//! - Metric calls are no-ops until a recorder is installed, so the
//!   library records unconditionally

pub mod logging;
pub mod metrics;
