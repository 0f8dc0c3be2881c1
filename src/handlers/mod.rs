//! Built-in handlers and the name → handler lookup used at startup.
//!
//! # Data Flow
//! ```text
//! HandlerConfig[] (config)
//!     → HandlerSet::from_config (one shared instance per name)
//!     → Router::from_config (tube.handler resolved by name)
//! ```
//!
//! # Design Decisions
//! - Real deployments register their own `Handler` implementations; the
//!   built-ins exist so the binary can run without any
//! - One instance per configured name, shared by every tube that names it

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{HandlerConfig, HandlerKind};
use crate::job::Handler;

pub use builtin::{LogHandler, NoopHandler};

/// Handlers addressable by name.
#[derive(Default)]
pub struct HandlerSet {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate the built-in handlers described by `configs`.
    pub fn from_config(configs: &[HandlerConfig]) -> Self {
        let mut set = Self::new();
        for config in configs {
            let handler: Arc<dyn Handler> = match config.kind {
                HandlerKind::Log => Arc::new(LogHandler::new(
                    config.name.clone(),
                    std::time::Duration::from_millis(config.delay_ms),
                )),
                HandlerKind::Noop => Arc::new(NoopHandler),
            };
            set.insert(config.name.clone(), handler);
        }
        set
    }

    /// Add or replace the handler known as `name`.
    pub fn insert(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
