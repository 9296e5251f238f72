//! Logging, tracing and metrics settings.
//!
//! # Environment Variables
//!
//! - `OBSERVABILITY_ENABLED`: `false` or `0` disables file logs, OpenTelemetry
//!   and metrics, leaving console logging only (default: enabled)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: `http://localhost:4317`)
//! - `ENVIRONMENT`: deployment environment reported to the collector (default: `development`)
//! - `LOG_DIR`: directory for rolling log files (default: `storage/logs`)
//! - `LOG_LEVEL`: console level when `RUST_LOG` is unset (default: `info`)
//! - `METRICS_PORT`: port of the Prometheus endpoint (default: 9000)

use std::env;

use crate::parse_var;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub enabled: bool,
    pub otlp_endpoint: String,
    pub environment: String,
    pub log_dir: String,
    pub log_level: String,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            otlp_endpoint: "http://localhost:4317".to_string(),
            environment: "development".to_string(),
            log_dir: "storage/logs".to_string(),
            log_level: "info".to_string(),
            metrics_port: 9000,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            enabled: lookup("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").unwrap_or(defaults.otlp_endpoint),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            metrics_port: parse_var(&lookup, "METRICS_PORT").unwrap_or(defaults.metrics_port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_by_default() {
        let config = ObservabilityConfig::from_lookup(|_| None);
        assert!(config.enabled);
        assert_eq!(config.metrics_port, 9000);
    }

    #[test]
    fn test_disable_flag_values() {
        for value in ["false", "FALSE", "0"] {
            let config = ObservabilityConfig::from_lookup(|key| match key {
                "OBSERVABILITY_ENABLED" => Some(value.to_string()),
                _ => None,
            });
            assert!(!config.enabled, "{} should disable observability", value);
        }
    }
}
