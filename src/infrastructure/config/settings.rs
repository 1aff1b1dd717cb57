//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the two store identifiers may
//! be overridden with `MATCH_STORE_DATABASE` and `STATISTICS_STORE_DATABASE`.
//!
//! # Example
//!
//! ```no_run
//! use matchstats::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use super::aggregation::AggregationConfig;
use super::feed::FeedConfig;
use super::logging::LoggingConfig;
use super::retry::RetryConfig;
use super::service::{IngestConfig, ServerConfig};
use super::storage::{StorageBackend, StorageConfig};
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Store backend and identifiers.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Change log retention window.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Aggregation worker pool, filter and redelivery policy.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Backoff for transient store errors.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Ingestion write bounds.
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.storage.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `server.bind` is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    field: "server.bind",
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Check that all values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ConfigError`].
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.bind_addr()?;

        if self.storage.backend == StorageBackend::Sqlite {
            if self.storage.match_store.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "storage.match_store",
                }
                .into());
            }
            if self.storage.statistics_store.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "storage.statistics_store",
                }
                .into());
            }
        }

        if self.feed.max_retained_events == 0 {
            return Err(invalid("feed.max_retained_events", "must be greater than 0"));
        }
        if self.feed.retention_secs == 0 {
            return Err(invalid("feed.retention_secs", "must be greater than 0"));
        }

        let aggregation = &self.aggregation;
        if aggregation.workers == 0 {
            return Err(invalid("aggregation.workers", "must be greater than 0"));
        }
        if aggregation.channel_capacity == 0 {
            return Err(invalid("aggregation.channel_capacity", "must be greater than 0"));
        }
        if aggregation.event_kinds.is_empty() {
            return Err(invalid(
                "aggregation.event_kinds",
                "at least one change kind is required",
            ));
        }
        if aggregation.invocation_timeout_ms == 0 {
            return Err(invalid(
                "aggregation.invocation_timeout_ms",
                "must be greater than 0",
            ));
        }
        if aggregation.max_delivery_attempts == 0 {
            return Err(invalid(
                "aggregation.max_delivery_attempts",
                "must be greater than 0",
            ));
        }

        let retry = &self.retry;
        if retry.initial_delay_ms == 0 {
            return Err(invalid("retry.initial_delay_ms", "must be greater than 0"));
        }
        if retry.max_delay_ms < retry.initial_delay_ms {
            return Err(invalid("retry.max_delay_ms", "must be >= initial_delay_ms"));
        }
        if retry.backoff_multiplier < 1.0 {
            return Err(invalid("retry.backoff_multiplier", "must be >= 1.0"));
        }
        if retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be greater than 0"));
        }

        if self.ingest.max_event_age_secs == 0 {
            return Err(invalid("ingest.max_event_age_secs", "must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeKind;
    use crate::error::Error;
    use crate::infrastructure::config::logging::LogFormat;
    use crate::port::outbound::feed::StartingPosition;

    fn field_of(err: Error) -> &'static str {
        match err {
            Error::Config(ConfigError::InvalidValue { field, .. })
            | Error::Config(ConfigError::MissingField { field }) => field,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.aggregation.starting_position, StartingPosition::Latest);
        assert_eq!(
            config.aggregation.event_kinds,
            vec![ChangeKind::Insert, ChangeKind::Modify]
        );
        assert_eq!(config.ingest.max_event_age_secs, 300);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [storage]
            backend = "memory"

            [aggregation]
            workers = 2
            starting_position = "earliest"
            event_kinds = ["insert", "modify", "remove"]
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.aggregation.workers, 2);
        assert_eq!(config.aggregation.starting_position, StartingPosition::Earliest);
        assert_eq!(config.aggregation.event_kinds.len(), 3);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = Config::parse_toml("[aggregation]\nworkers = 0\n").unwrap_err();
        assert_eq!(field_of(err), "aggregation.workers");
    }

    #[test]
    fn empty_event_kinds_is_rejected() {
        let err = Config::parse_toml("[aggregation]\nevent_kinds = []\n").unwrap_err();
        assert_eq!(field_of(err), "aggregation.event_kinds");
    }

    #[test]
    fn max_delay_below_initial_is_rejected() {
        let err = Config::parse_toml("[retry]\ninitial_delay_ms = 500\nmax_delay_ms = 100\n")
            .unwrap_err();
        assert_eq!(field_of(err), "retry.max_delay_ms");
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let err = Config::parse_toml("[server]\nbind = \"not-an-address\"\n").unwrap_err();
        assert_eq!(field_of(err), "server.bind");
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let err = Config::parse_toml("[storage]\nbackend = \"dynamo\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
