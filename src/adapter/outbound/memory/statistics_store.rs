//! In-memory Statistics Store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{MatchId, TeamName, TeamStatistics};
use crate::error::Result;
use crate::port::outbound::store::StatisticsStore;

/// Statistics Store backed by an ordered map keyed by `(team, match)`.
#[derive(Default)]
pub struct MemoryStatisticsStore {
    rows: RwLock<BTreeMap<(TeamName, MatchId), TeamStatistics>>,
}

impl MemoryStatisticsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl StatisticsStore for MemoryStatisticsStore {
    async fn upsert(&self, row: &TeamStatistics) -> Result<()> {
        self.rows.write().insert(
            (row.team_name.clone(), row.match_id.clone()),
            row.clone(),
        );
        Ok(())
    }

    async fn get(&self, team: &TeamName, match_id: &MatchId) -> Result<Option<TeamStatistics>> {
        Ok(self
            .rows
            .read()
            .get(&(team.clone(), match_id.clone()))
            .cloned())
    }

    async fn list_team(&self, team: &TeamName) -> Result<Vec<TeamStatistics>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|((t, _), _)| t == team)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<TeamStatistics>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|((_, m), _)| m == match_id)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn delete(&self, team: &TeamName, match_id: &MatchId) -> Result<bool> {
        Ok(self
            .rows
            .write()
            .remove(&(team.clone(), match_id.clone()))
            .is_some())
    }
}
