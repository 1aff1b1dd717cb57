//! Persistence ports for match records and team statistics.

use async_trait::async_trait;

use crate::domain::{ChangeKind, MatchId, MatchKey, MatchRecord, TeamName, TeamStatistics};
use crate::error::Result;

/// Durable store of match records keyed by `(match_id, timestamp)`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Upsert a record by its key.
    ///
    /// Returns [`ChangeKind::Insert`] when the key was new and
    /// [`ChangeKind::Modify`] when an existing record was replaced.
    /// Fails with a validation error if required key fields are absent.
    async fn put(&self, record: &MatchRecord) -> Result<ChangeKind>;

    /// Delete a record. Returns whether a record existed.
    async fn delete(&self, key: &MatchKey) -> Result<bool>;

    /// Fetch one record.
    async fn get(&self, key: &MatchKey) -> Result<Option<MatchRecord>>;

    /// All revisions of one match, ordered by timestamp.
    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<MatchRecord>>;

    /// Every record, ordered by match id then timestamp.
    async fn list(&self) -> Result<Vec<MatchRecord>>;
}

/// Durable store of per-team statistics keyed by `(team_name, match_id)`.
///
/// `upsert` replaces the whole row; there is no delta-add operation.
#[async_trait]
pub trait StatisticsStore: Send + Sync {
    /// Insert or fully replace a row.
    async fn upsert(&self, row: &TeamStatistics) -> Result<()>;

    /// Fetch one row.
    async fn get(&self, team: &TeamName, match_id: &MatchId) -> Result<Option<TeamStatistics>>;

    /// Every row of one team, ordered by match id. Empty for unknown teams.
    async fn list_team(&self, team: &TeamName) -> Result<Vec<TeamStatistics>>;

    /// Every row of one match, ordered by team name.
    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<TeamStatistics>>;

    /// Remove a row. Returns whether it existed.
    async fn delete(&self, team: &TeamName, match_id: &MatchId) -> Result<bool>;
}
