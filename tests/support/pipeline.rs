//! A fully wired in-memory pipeline plus helpers to drive it.

use std::sync::Arc;

use matchstats::adapter::outbound::feed::ChangeLogReader;
use matchstats::application::aggregation::{DispatchStats, Dispatcher};
use matchstats::application::ingest::IngestReceipt;
use matchstats::domain::{MatchId, MatchSubmission, TeamName, TeamStatistics};
use matchstats::infrastructure::bootstrap::{self, Pipeline, Stores};
use matchstats::infrastructure::config::settings::Config;
use matchstats::port::outbound::feed::StartingPosition;
use matchstats::port::outbound::store::StatisticsStore;
use matchstats::testkit::config::fast_config;

pub struct Harness {
    pub config: Config,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn memory() -> Self {
        let config = fast_config();
        let pipeline = bootstrap::build(&config).expect("build in-memory pipeline");
        Self { config, pipeline }
    }

    pub fn with_stores(stores: Stores) -> Self {
        let config = fast_config();
        let pipeline = bootstrap::assemble(&config, stores);
        Self { config, pipeline }
    }

    /// Reader over everything published so far.
    pub fn backlog(&self) -> ChangeLogReader {
        self.pipeline.log.subscribe(StartingPosition::Earliest)
    }

    /// Close the log and aggregate everything it holds.
    pub async fn drain(&self) -> DispatchStats {
        let reader = self.backlog();
        self.pipeline.log.close();
        Dispatcher::new(Arc::clone(&self.pipeline.engine), &self.config.aggregation)
            .run(reader)
            .await
    }

    pub async fn ingest(&self, submission: MatchSubmission) -> IngestReceipt {
        self.pipeline
            .ingestion
            .ingest(submission)
            .await
            .expect("ingest submission")
    }

    pub async fn row(&self, team: &str, match_id: &str) -> Option<TeamStatistics> {
        self.pipeline
            .statistics
            .get(&TeamName::new(team), &MatchId::new(match_id))
            .await
            .expect("read statistics row")
    }
}

pub fn submission(
    match_id: &str,
    timestamp: &str,
    team: &str,
    opponent: &str,
    event_type: &str,
    details: serde_json::Value,
) -> MatchSubmission {
    MatchSubmission {
        match_id: Some(match_id.into()),
        timestamp: Some(timestamp.into()),
        team: Some(team.into()),
        opponent: Some(opponent.into()),
        event_type: Some(event_type.into()),
        event_details: Some(details),
    }
}
