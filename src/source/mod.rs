//! Demo job source.
//!
//! # Data Flow
//! ```text
//! stdin (one JSON object per line)
//!     → lines.rs (skip blanks, decode {"tube", "body"})
//!     → Job
//!     → Router::dispatch (main.rs)
//! ```
//!
//! # Design Decisions
//! - Stands in for a real queue client; the router does not depend on it
//! - A malformed line is an error for that line only; the caller decides
//!   whether to skip it
//! - No acknowledgement: lines are consumed as read

pub mod lines;

pub use lines::{LineSource, SourceError};
