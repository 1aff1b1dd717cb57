use thiserror::Error;

use crate::domain::error::{DecodeError, ValidationError};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures talking to either the Match Store or the Statistics Store.
///
/// The split matters to callers: transient failures are retried locally with
/// bounded backoff, permanent ones are surfaced immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Timeout, lock contention or pool exhaustion.
    #[error("transient store error: {0}")]
    Transient(String),

    /// Schema mismatch, constraint violation, corrupt row, missing table.
    #[error("permanent store error: {0}")]
    Permanent(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when retrying the same operation may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Store(StoreError::Transient(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_store_errors_are_retryable() {
        assert!(Error::from(StoreError::Transient("busy".into())).is_transient());
        assert!(!Error::from(StoreError::Permanent("no such table".into())).is_transient());
        assert!(!Error::Timeout {
            operation: "invocation",
            after_ms: 10
        }
        .is_transient());
        assert!(!Error::from(ValidationError::MissingField { field: "match_id" }).is_transient());
    }

    #[test]
    fn store_error_messages_name_the_class() {
        let err = StoreError::Permanent("schema mismatch".into());
        assert_eq!(err.to_string(), "permanent store error: schema mismatch");
    }
}
