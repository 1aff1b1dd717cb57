//! Change feed retention configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::feed::Retention;

/// Retention window of the in-process change log.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Events older than this are trimmed (seconds).
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    /// Hard cap on retained events.
    #[serde(default = "default_max_retained_events")]
    pub max_retained_events: usize,
}

const fn default_retention_secs() -> u64 {
    86_400 // 24 hours
}

const fn default_max_retained_events() -> usize {
    100_000
}

impl FeedConfig {
    #[must_use]
    pub fn retention(&self) -> Retention {
        Retention {
            max_age: Duration::from_secs(self.retention_secs),
            max_events: self.max_retained_events,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            max_retained_events: default_max_retained_events(),
        }
    }
}
