//! SQLite team statistics store implementation.
//!
//! Rows are written with `REPLACE INTO`, so an upsert swaps the entire row
//! atomically and readers never observe a half-written row.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::{pool_error, query_error, DbPool};
use crate::adapter::outbound::sqlite::database::model::TeamStatisticsRow;
use crate::adapter::outbound::sqlite::database::schema::team_statistics;
use crate::domain::{Contribution, MatchId, MatchResult, TeamName, TeamStatistics, Timestamp};
use crate::error::{Result, StoreError};
use crate::port::outbound::store::StatisticsStore;

/// SQLite-backed Statistics Store.
pub struct SqliteStatisticsStore {
    pool: DbPool,
}

impl SqliteStatisticsStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(stats: &TeamStatistics) -> Result<TeamStatisticsRow> {
        Ok(TeamStatisticsRow {
            team_name: stats.team_name.to_string(),
            match_id: stats.match_id.to_string(),
            opponent: stats.opponent.to_string(),
            date: stats.date.to_string(),
            goals_scored: counter_to_column(stats.goals_scored),
            goals_conceded: counter_to_column(stats.goals_conceded),
            fouls: counter_to_column(stats.fouls),
            result: stats.result.to_string(),
            contributions: serde_json::to_string(&stats.contributions)?,
        })
    }

    /// Rebuild the domain row from its stored contributions.
    ///
    /// The counter columns exist for ad-hoc SQL; the contributions map is
    /// authoritative.
    fn from_row(row: TeamStatisticsRow) -> Result<TeamStatistics> {
        let corrupt = |what: &str, detail: String| {
            StoreError::Permanent(format!(
                "corrupt {what} for {}/{}: {detail}",
                row.team_name, row.match_id
            ))
        };

        let contributions: BTreeMap<Timestamp, Contribution> =
            serde_json::from_str(&row.contributions)
                .map_err(|e| corrupt("contributions", e.to_string()))?;
        row.result
            .parse::<MatchResult>()
            .map_err(|e| corrupt("result", e))?;

        Ok(TeamStatistics::from_contributions(
            TeamName::new(row.team_name.clone()),
            MatchId::new(row.match_id.clone()),
            TeamName::new(row.opponent.clone()),
            contributions,
        ))
    }
}

fn counter_to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[async_trait]
impl StatisticsStore for SqliteStatisticsStore {
    async fn upsert(&self, row: &TeamStatistics) -> Result<()> {
        let row = Self::to_row(row)?;
        let mut conn = self.pool.get().map_err(pool_error)?;

        diesel::replace_into(team_statistics::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(())
    }

    async fn get(&self, team: &TeamName, match_id: &MatchId) -> Result<Option<TeamStatistics>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let row: Option<TeamStatisticsRow> = team_statistics::table
            .find((team.as_str(), match_id.as_str()))
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        row.map(Self::from_row).transpose()
    }

    async fn list_team(&self, team: &TeamName) -> Result<Vec<TeamStatistics>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let rows: Vec<TeamStatisticsRow> = team_statistics::table
            .filter(team_statistics::team_name.eq(team.as_str()))
            .order(team_statistics::match_id.asc())
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<TeamStatistics>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let rows: Vec<TeamStatisticsRow> = team_statistics::table
            .filter(team_statistics::match_id.eq(match_id.as_str()))
            .order(team_statistics::team_name.asc())
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn delete(&self, team: &TeamName, match_id: &MatchId) -> Result<bool> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let target = team_statistics::table.find((team.as_str(), match_id.as_str()));
        let deleted = diesel::delete(target)
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::TeamContribution;

    fn store() -> SqliteStatisticsStore {
        SqliteStatisticsStore::new(open(":memory:").expect("open sqlite"))
    }

    fn row(team: &str, opponent: &str, match_id: &str, scored: u32) -> TeamStatistics {
        TeamStatistics::apply(
            None,
            &MatchId::new(match_id),
            &Timestamp::new("2024-05-01T18:00:00Z"),
            &TeamContribution {
                team: TeamName::new(team),
                opponent: TeamName::new(opponent),
                contribution: Contribution {
                    goals_scored: scored,
                    ..Contribution::default()
                },
            },
        )
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let store = store();
        let stats = row("Alpha", "Beta", "m1", 2);
        store.upsert(&stats).await.unwrap();

        let loaded = store
            .get(&TeamName::new("Alpha"), &MatchId::new("m1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, stats);
    }

    #[tokio::test]
    async fn upsert_replaces_whole_row() {
        let store = store();
        store.upsert(&row("Alpha", "Beta", "m1", 3)).await.unwrap();
        store.upsert(&row("Alpha", "Beta", "m1", 1)).await.unwrap();

        let rows = store.list_team(&TeamName::new("Alpha")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].goals_scored, 1);
    }

    #[tokio::test]
    async fn list_team_only_returns_that_team() {
        let store = store();
        store.upsert(&row("Alpha", "Beta", "m1", 1)).await.unwrap();
        store.upsert(&row("Alpha", "Gamma", "m2", 0)).await.unwrap();
        store.upsert(&row("Beta", "Alpha", "m1", 0)).await.unwrap();

        let rows = store.list_team(&TeamName::new("Alpha")).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.match_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn list_match_returns_both_sides() {
        let store = store();
        store.upsert(&row("Beta", "Alpha", "m1", 0)).await.unwrap();
        store.upsert(&row("Alpha", "Beta", "m1", 1)).await.unwrap();
        store.upsert(&row("Alpha", "Gamma", "m2", 0)).await.unwrap();

        let rows = store.list_match(&MatchId::new("m1")).await.unwrap();
        let teams: Vec<_> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(teams, vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn delete_removes_only_that_row() {
        let store = store();
        store.upsert(&row("Alpha", "Beta", "m1", 1)).await.unwrap();
        store.upsert(&row("Beta", "Alpha", "m1", 0)).await.unwrap();

        assert!(store
            .delete(&TeamName::new("Beta"), &MatchId::new("m1"))
            .await
            .unwrap());
        assert!(!store
            .delete(&TeamName::new("Beta"), &MatchId::new("m1"))
            .await
            .unwrap());
        let rows = store.list_match(&MatchId::new("m1")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_name.as_str(), "Alpha");
    }

    #[tokio::test]
    async fn unknown_team_has_no_rows() {
        let store = store();
        assert!(store
            .list_team(&TeamName::new("Nobody"))
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .get(&TeamName::new("Nobody"), &MatchId::new("m1"))
            .await
            .unwrap()
            .is_none());
    }
}
