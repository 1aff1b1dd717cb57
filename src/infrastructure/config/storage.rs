//! Store selection and identifiers.

use serde::Deserialize;

/// Environment variable overriding [`StorageConfig::match_store`].
pub const MATCH_STORE_ENV: &str = "MATCH_STORE_DATABASE";
/// Environment variable overriding [`StorageConfig::statistics_store`].
pub const STATISTICS_STORE_ENV: &str = "STATISTICS_STORE_DATABASE";

/// Which adapter backs the two stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Process-local maps; nothing survives a restart.
    Memory,
}

/// Identifiers of the Match Store and the Statistics Store.
///
/// For the SQLite backend these are database paths (or `:memory:`).
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_match_store")]
    pub match_store: String,
    #[serde(default = "default_statistics_store")]
    pub statistics_store: String,
}

fn default_match_store() -> String {
    "matches.db".into()
}

fn default_statistics_store() -> String {
    "statistics.db".into()
}

impl StorageConfig {
    /// Replace store identifiers with any set environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_env(MATCH_STORE_ENV) {
            self.match_store = value;
        }
        if let Some(value) = non_empty_env(STATISTICS_STORE_ENV) {
            self.statistics_store = value;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            match_store: default_match_store(),
            statistics_store: default_statistics_store(),
        }
    }
}
