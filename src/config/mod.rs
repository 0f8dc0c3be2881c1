//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → WorkerConfig (validated, immutable)
//!     → handlers + router built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; tubes cannot be added or changed at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::WorkerConfig;
pub use schema::TubeConfig;
pub use schema::HandlerConfig;
pub use schema::HandlerKind;
pub use schema::ObservabilityConfig;
pub use schema::ShutdownConfig;
