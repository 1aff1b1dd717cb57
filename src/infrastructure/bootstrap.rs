//! Composition root: stores, change log and services wired from [`Config`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::inbound::http::ApiState;
use crate::adapter::outbound::feed::{ChangeLog, PublishingMatchStore};
use crate::adapter::outbound::memory::match_store::MemoryMatchStore;
use crate::adapter::outbound::memory::statistics_store::MemoryStatisticsStore;
use crate::adapter::outbound::sqlite::database::connection::{open, open_existing};
use crate::adapter::outbound::sqlite::match_store::SqliteMatchStore;
use crate::adapter::outbound::sqlite::statistics_store::SqliteStatisticsStore;
use crate::application::aggregation::{AggregationEngine, EventFilter};
use crate::application::ingest::IngestionService;
use crate::application::query::QueryService;
use crate::application::retry::RetryPolicy;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::storage::{StorageBackend, StorageConfig};
use crate::port::outbound::store::{MatchStore, StatisticsStore};

/// The two durable stores, before any decoration.
pub struct Stores {
    pub matches: Arc<dyn MatchStore>,
    pub statistics: Arc<dyn StatisticsStore>,
}

/// Open the configured store backend, running migrations for SQLite.
///
/// # Errors
/// Returns an error if a database cannot be opened or migrated.
pub fn open_stores(config: &StorageConfig) -> Result<Stores> {
    let stores = match config.backend {
        StorageBackend::Sqlite => Stores {
            matches: Arc::new(SqliteMatchStore::new(open(&config.match_store)?)),
            statistics: Arc::new(SqliteStatisticsStore::new(open(&config.statistics_store)?)),
        },
        StorageBackend::Memory => Stores {
            matches: Arc::new(MemoryMatchStore::new()),
            statistics: Arc::new(MemoryStatisticsStore::new()),
        },
    };
    info!(
        backend = ?config.backend,
        match_store = %config.match_store,
        statistics_store = %config.statistics_store,
        "Stores opened"
    );
    Ok(stores)
}

/// Open only the Statistics Store for reading.
///
/// Nothing is created or migrated; a SQLite store must already exist.
///
/// # Errors
/// Returns an error if the database is missing or has no statistics table.
pub fn open_statistics_reader(config: &StorageConfig) -> Result<Arc<dyn StatisticsStore>> {
    let statistics: Arc<dyn StatisticsStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStatisticsStore::new(open_existing(
            &config.statistics_store,
            "team_statistics",
        )?)),
        StorageBackend::Memory => Arc::new(MemoryStatisticsStore::new()),
    };
    info!(
        backend = ?config.backend,
        statistics_store = %config.statistics_store,
        "Statistics store opened for reading"
    );
    Ok(statistics)
}

/// Everything the runtime needs, fully wired.
pub struct Pipeline {
    /// Change log fed by every Match Store write.
    pub log: Arc<ChangeLog>,
    /// Match Store as seen by callers: writes publish to `log`.
    pub matches: Arc<dyn MatchStore>,
    pub statistics: Arc<dyn StatisticsStore>,
    pub engine: Arc<AggregationEngine>,
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
}

impl Pipeline {
    #[must_use]
    pub fn api_state(&self) -> ApiState {
        ApiState {
            ingestion: Arc::clone(&self.ingestion),
            query: Arc::clone(&self.query),
        }
    }
}

/// Wire `stores` into a pipeline according to `config`.
#[must_use]
pub fn assemble(config: &Config, stores: Stores) -> Pipeline {
    let log = Arc::new(ChangeLog::new(config.feed.retention()));
    let matches: Arc<dyn MatchStore> = Arc::new(PublishingMatchStore::new(
        stores.matches,
        Arc::clone(&log),
    ));
    let statistics = stores.statistics;
    let retry = RetryPolicy::new(&config.retry);

    let engine = Arc::new(AggregationEngine::new(
        Arc::clone(&statistics),
        EventFilter::new(config.aggregation.event_kinds.iter().copied()),
        retry.clone(),
        config.aggregation.invocation_timeout(),
    ));
    let ingestion = Arc::new(IngestionService::new(
        Arc::clone(&matches),
        retry,
        config.ingest.max_event_age(),
    ));
    let query = Arc::new(QueryService::new(
        Arc::clone(&matches),
        Arc::clone(&statistics),
    ));

    Pipeline {
        log,
        matches,
        statistics,
        engine,
        ingestion,
        query,
    }
}

/// Open the configured stores and assemble the pipeline.
///
/// # Errors
/// Returns an error if the stores cannot be opened.
pub fn build(config: &Config) -> Result<Pipeline> {
    Ok(assemble(config, open_stores(&config.storage)?))
}
