//! Startup orchestration.
//!
//! # Responsibilities
//! - Instantiate configured handlers
//! - Register every configured tube before any job is read
//!
//! # Design Decisions
//! - Fail fast: any registration error is fatal
//! - Tubes register in config order so the first bad entry is reported

use crate::config::WorkerConfig;
use crate::handlers::HandlerSet;
use crate::routing::{Router, RouterError};

/// Build the router described by `config`.
pub fn build_router(config: &WorkerConfig) -> Result<Router, RouterError> {
    let handlers = HandlerSet::from_config(&config.handlers);
    tracing::debug!(handlers = handlers.len(), "Handlers initialised");

    let router = Router::from_config(&config.tubes, &handlers)?;
    tracing::info!(tubes = router.len(), "Router ready");
    Ok(router)
}
