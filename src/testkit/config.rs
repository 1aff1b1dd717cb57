//! Canonical test configuration.

use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::storage::StorageBackend;

/// In-memory stores, millisecond retry and redelivery delays.
#[must_use]
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config.server.bind = "127.0.0.1:0".into();
    config.aggregation.workers = 2;
    config.aggregation.channel_capacity = 16;
    config.aggregation.invocation_timeout_ms = 2_000;
    config.aggregation.redelivery_delay_ms = 1;
    config.retry.initial_delay_ms = 1;
    config.retry.max_delay_ms = 2;
    config.retry.max_attempts = 3;
    config
}
