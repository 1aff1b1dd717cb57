//! Query Service: read-only views over both stores.
//!
//! Statistics come from the Statistics Store and lag the Match Store by
//! the aggregation delay; nothing here writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{MatchId, MatchRecord, TeamName, TeamStatistics, TeamSummary, Timestamp};
use crate::error::Result;
use crate::port::outbound::store::{MatchStore, StatisticsStore};

/// Goal totals shown in the match list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalTotals {
    pub total_goals_scored: u32,
    pub total_goals_conceded: u32,
}

/// One entry of `GET /matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub team: TeamName,
    pub opponent: TeamName,
    pub date: Timestamp,
    pub event_count: usize,
    pub statistics: GoalTotals,
}

/// One revision of a match as shown in its detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    pub event_type: String,
    pub timestamp: Timestamp,
    pub player: Option<Value>,
    pub goal_type: Option<Value>,
    pub minute: Option<Value>,
    pub video_url: Option<Value>,
}

impl MatchEvent {
    fn from_record(record: &MatchRecord) -> Self {
        let detail = |name: &str| {
            record
                .event_details
                .get(name)
                .filter(|v| !v.is_null())
                .cloned()
        };
        // `player` is either a bare name or an object carrying one.
        let player = detail("player").map(|p| match p.get("name") {
            Some(name) => name.clone(),
            None => p,
        });

        Self {
            event_type: record.event_type.clone(),
            timestamp: record.timestamp.clone(),
            player,
            goal_type: detail("goal_type"),
            minute: detail("minute"),
            video_url: detail("video_url"),
        }
    }
}

/// `GET /matches/{match_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetail {
    pub match_id: MatchId,
    pub team: TeamName,
    pub opponent: TeamName,
    pub date: Timestamp,
    pub events: Vec<MatchEvent>,
}

/// `GET /matches/{match_id}/statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchTotals {
    pub team: TeamName,
    pub opponent: TeamName,
    pub total_goals: u32,
    pub total_fouls: u32,
}

/// `GET /teams/{team_name}/statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamReport {
    pub team: TeamName,
    pub statistics: TeamSummary,
    pub matches: Vec<TeamStatistics>,
}

impl TeamReport {
    /// Read `team`'s rows from `statistics` and total them.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn load(statistics: &dyn StatisticsStore, team: &TeamName) -> Result<Self> {
        let matches = statistics.list_team(team).await?;
        Ok(Self {
            team: team.clone(),
            statistics: TeamSummary::from_rows(&matches),
            matches,
        })
    }
}

pub struct QueryService {
    matches: Arc<dyn MatchStore>,
    statistics: Arc<dyn StatisticsStore>,
}

impl QueryService {
    #[must_use]
    pub fn new(matches: Arc<dyn MatchStore>, statistics: Arc<dyn StatisticsStore>) -> Self {
        Self {
            matches,
            statistics,
        }
    }

    /// Every match, one summary each, ordered by match id.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
        let mut grouped: BTreeMap<MatchId, Vec<MatchRecord>> = BTreeMap::new();
        for record in self.matches.list().await? {
            grouped.entry(record.match_id.clone()).or_default().push(record);
        }

        let mut summaries = Vec::with_capacity(grouped.len());
        for (match_id, records) in grouped {
            let Some(first) = earliest(&records) else {
                continue;
            };
            let row = self.statistics.get(&first.team, &match_id).await?;
            let statistics = row
                .map(|r| GoalTotals {
                    total_goals_scored: r.goals_scored,
                    total_goals_conceded: r.goals_conceded,
                })
                .unwrap_or_default();

            summaries.push(MatchSummary {
                match_id,
                team: first.team.clone(),
                opponent: first.opponent.clone(),
                date: first.timestamp.clone(),
                event_count: records.len(),
                statistics,
            });
        }
        Ok(summaries)
    }

    /// All revisions of one match, or `None` if it has none.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn match_detail(&self, match_id: &MatchId) -> Result<Option<MatchDetail>> {
        let records = self.matches.list_match(match_id).await?;
        let Some(first) = earliest(&records) else {
            return Ok(None);
        };

        let date = self
            .statistics
            .get(&first.team, match_id)
            .await?
            .map_or_else(|| first.timestamp.clone(), |row| row.date);

        Ok(Some(MatchDetail {
            match_id: match_id.clone(),
            team: first.team.clone(),
            opponent: first.opponent.clone(),
            date,
            events: records.iter().map(MatchEvent::from_record).collect(),
        }))
    }

    /// Goal and foul totals of one match from the acting team's row.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn match_statistics(&self, match_id: &MatchId) -> Result<Option<MatchTotals>> {
        let records = self.matches.list_match(match_id).await?;
        let Some(first) = earliest(&records) else {
            return Ok(None);
        };

        let row = self.statistics.get(&first.team, match_id).await?;
        let (total_goals, total_fouls) = row.map_or((0, 0), |r| {
            (r.goals_scored.saturating_add(r.goals_conceded), r.fouls)
        });

        Ok(Some(MatchTotals {
            team: first.team.clone(),
            opponent: first.opponent.clone(),
            total_goals,
            total_fouls,
        }))
    }

    /// Per-match rows and totals for a team. Unknown teams get zeros.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn team_statistics(&self, team: &TeamName) -> Result<TeamReport> {
        TeamReport::load(self.statistics.as_ref(), team).await
    }
}

fn earliest(records: &[MatchRecord]) -> Option<&MatchRecord> {
    records.iter().min_by(|a, b| a.timestamp.cmp(&b.timestamp))
}
