//! HTTP server and ingestion settings.

use std::time::Duration;

use serde::Deserialize;

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Ingestion write bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// A write still failing after this long is abandoned (seconds).
    #[serde(default = "default_max_event_age_secs")]
    pub max_event_age_secs: u64,
}

const fn default_max_event_age_secs() -> u64 {
    300 // 5 minutes
}

impl IngestConfig {
    #[must_use]
    pub fn max_event_age(&self) -> Duration {
        Duration::from_secs(self.max_event_age_secs)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_event_age_secs: default_max_event_age_secs(),
        }
    }
}
