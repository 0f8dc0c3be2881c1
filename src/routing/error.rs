//! Misconfiguration errors raised by the router.

use thiserror::Error;

/// Ways a router can be wired incorrectly.
///
/// None of these are transient: they mean registration or the job source
/// is broken and must be fixed, not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid tube: tube name must not be empty")]
    EmptyTube,

    #[error("nil handler for tube {tube}")]
    MissingHandler { tube: String },

    #[error("multiple registrations for {tube}")]
    DuplicateTube { tube: String },

    #[error("limit {limit} for tube {tube} exceeds maximum of {max}")]
    LimitTooLarge { tube: String, limit: usize, max: usize },

    #[error("no handler for tube {tube}")]
    UnknownTube { tube: String },
}

impl RouterError {
    /// The tube the error is about, if any.
    pub fn tube(&self) -> Option<&str> {
        match self {
            RouterError::EmptyTube => None,
            RouterError::MissingHandler { tube }
            | RouterError::DuplicateTube { tube }
            | RouterError::LimitTooLarge { tube, .. }
            | RouterError::UnknownTube { tube } => Some(tube),
        }
    }
}
