//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (tubes reference existing handlers)
//! - Validate value ranges (limits, log level, metrics address)
//! - Detect duplicate tube and handler names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WorkerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::WorkerConfig;
use crate::routing::MAX_LIMIT;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tubes[{index}]: tube name must not be empty")]
    EmptyTubeName { index: usize },

    #[error("tube {name}: declared more than once")]
    DuplicateTube { name: String },

    #[error("tube {tube}: unknown handler {handler}")]
    UnknownHandler { tube: String, handler: String },

    #[error("tube {tube}: limit {limit} exceeds maximum of {max}")]
    LimitTooLarge { tube: String, limit: usize, max: usize },

    #[error("handlers[{index}]: handler name must not be empty")]
    EmptyHandlerName { index: usize },

    #[error("handler {name}: declared more than once")]
    DuplicateHandler { name: String },

    #[error("invalid log level {level}")]
    InvalidLogLevel { level: String },

    #[error("invalid metrics address {address}")]
    InvalidMetricsAddress { address: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &WorkerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut handler_names = HashSet::new();
    for (index, handler) in config.handlers.iter().enumerate() {
        if handler.name.is_empty() {
            errors.push(ValidationError::EmptyHandlerName { index });
        } else if !handler_names.insert(handler.name.as_str()) {
            errors.push(ValidationError::DuplicateHandler {
                name: handler.name.clone(),
            });
        }
    }

    let mut tube_names = HashSet::new();
    for (index, tube) in config.tubes.iter().enumerate() {
        if tube.name.is_empty() {
            errors.push(ValidationError::EmptyTubeName { index });
        } else if !tube_names.insert(tube.name.as_str()) {
            errors.push(ValidationError::DuplicateTube {
                name: tube.name.clone(),
            });
        }

        if !handler_names.contains(tube.handler.as_str()) {
            errors.push(ValidationError::UnknownHandler {
                tube: tube.name.clone(),
                handler: tube.handler.clone(),
            });
        }

        if tube.limit > MAX_LIMIT {
            errors.push(ValidationError::LimitTooLarge {
                tube: tube.name.clone(),
                limit: tube.limit,
                max: MAX_LIMIT,
            });
        }
    }

    let level = &config.observability.log_level;
    if level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel {
            level: level.clone(),
        });
    }

    let address = &config.observability.metrics_address;
    if config.observability.metrics_enabled && address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress {
            address: address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{HandlerConfig, HandlerKind, TubeConfig};

    fn tube(name: &str, handler: &str, limit: usize) -> TubeConfig {
        TubeConfig {
            name: name.into(),
            handler: handler.into(),
            limit,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&WorkerConfig::default()), Ok(()));
    }

    #[test]
    fn test_duplicate_tube_and_unknown_handler() {
        let mut config = WorkerConfig::default();
        config.tubes.push(tube("emails", "log", 2));
        config.tubes.push(tube("emails", "log", 1));
        config.tubes.push(tube("sms", "texter", 1));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateTube {
                    name: "emails".into()
                },
                ValidationError::UnknownHandler {
                    tube: "sms".into(),
                    handler: "texter".into()
                },
            ]
        );
    }

    #[test]
    fn test_handler_names_checked() {
        let mut config = WorkerConfig::default();
        config.handlers.push(HandlerConfig {
            name: "log".into(),
            kind: HandlerKind::Noop,
            delay_ms: 0,
        });
        config.handlers.push(HandlerConfig {
            name: String::new(),
            kind: HandlerKind::Noop,
            delay_ms: 0,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateHandler { name: "log".into() },
                ValidationError::EmptyHandlerName { index: 2 },
            ]
        );
    }

    #[test]
    fn test_limit_zero_allowed_but_not_too_large() {
        let mut config = WorkerConfig::default();
        config.tubes.push(tube("paused", "log", 0));
        assert_eq!(validate_config(&config), Ok(()));

        config.tubes.push(tube("huge", "log", MAX_LIMIT + 1));
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::LimitTooLarge { tube, .. }] if tube == "huge"
        ));
    }

    #[test]
    fn test_observability_values() {
        let mut config = WorkerConfig::default();
        config.observability.log_level = "loud".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-addr".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "invalid log level loud");
        assert_eq!(errors[1].to_string(), "invalid metrics address not-an-addr");
    }
}
