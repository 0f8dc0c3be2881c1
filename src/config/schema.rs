//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the worker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Tubes to register, each bound to a handler by name.
    pub tubes: Vec<TubeConfig>,

    /// Handlers available to tubes.
    pub handlers: Vec<HandlerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            tubes: Vec::new(),
            handlers: vec![HandlerConfig {
                name: "log".to_string(),
                kind: HandlerKind::Log,
                delay_ms: 0,
            }],
            observability: ObservabilityConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

/// A tube and the handler that processes its jobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TubeConfig {
    /// Tube name, matched exactly against `Job::tube`.
    pub name: String,

    /// Name of an entry in `handlers`.
    pub handler: String,

    /// Maximum concurrent jobs for this tube (0 pauses the tube).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    1
}

/// Built-in handler kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// Log each job, optionally sleeping to simulate work.
    Log,
    /// Accept each job and do nothing.
    Noop,
}

/// A named handler instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Name tubes refer to.
    pub name: String,

    pub kind: HandlerKind,

    /// Simulated work per job in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to wait for in-flight jobs before exiting anyway.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: WorkerConfig = toml::from_str("").unwrap();
        assert!(config.tubes.is_empty());
        assert_eq!(config.handlers.len(), 1);
        assert_eq!(config.handlers[0].kind, HandlerKind::Log);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.shutdown.drain_timeout_secs, 30);
    }

    #[test]
    fn test_parse_tubes_and_handlers() {
        let config: WorkerConfig = toml::from_str(
            r#"
            [observability]
            log_level = "debug"

            [[handlers]]
            name = "slow"
            kind = "log"
            delay_ms = 50

            [[handlers]]
            name = "sink"
            kind = "noop"

            [[tubes]]
            name = "emails"
            handler = "slow"
            limit = 2

            [[tubes]]
            name = "sms"
            handler = "sink"
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.handlers.len(), 2);
        assert_eq!(config.handlers[0].delay_ms, 50);
        assert_eq!(config.handlers[1].kind, HandlerKind::Noop);
        assert_eq!(config.tubes[0].limit, 2);
        assert_eq!(config.tubes[1].limit, 1);
    }

    #[test]
    fn test_unknown_handler_kind_rejected() {
        let parsed: Result<WorkerConfig, _> = toml::from_str(
            r#"
            [[handlers]]
            name = "x"
            kind = "shell"
            "#,
        );
        assert!(parsed.is_err());
    }
}
