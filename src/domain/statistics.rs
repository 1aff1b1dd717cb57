//! Per-team, per-match statistics rows and team totals.
//!
//! A [`TeamStatistics`] row keeps every contribution it was built from,
//! keyed by the source record's timestamp. The visible counters are always
//! recomputed from that map, so re-applying a record replaces its entry
//! instead of adding to it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::{MatchId, TeamName, Timestamp};
use super::outcome::{Contribution, TeamContribution};

/// Outcome of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    /// Result implied by a goal difference.
    #[must_use]
    pub fn from_goal_difference(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => MatchResult::Win,
            std::cmp::Ordering::Less => MatchResult::Loss,
            std::cmp::Ordering::Equal => MatchResult::Draw,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Draw => "draw",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(MatchResult::Win),
            "loss" => Ok(MatchResult::Loss),
            "draw" => Ok(MatchResult::Draw),
            other => Err(format!("unknown match result '{other}'")),
        }
    }
}

/// Statistics Store row for `(team_name, match_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team_name: TeamName,
    pub match_id: MatchId,
    pub opponent: TeamName,
    /// Earliest contributing timestamp.
    pub date: Timestamp,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub fouls: u32,
    pub result: MatchResult,
    pub contributions: BTreeMap<Timestamp, Contribution>,
}

impl TeamStatistics {
    /// Compute the row that results from applying one record's contribution
    /// on top of the currently stored row (if any).
    ///
    /// Pure and idempotent: `apply(Some(&apply(prev, ..)), ..)` with the same
    /// arguments returns the same row again.
    #[must_use]
    pub fn apply(
        current: Option<&TeamStatistics>,
        match_id: &MatchId,
        timestamp: &Timestamp,
        entry: &TeamContribution,
    ) -> TeamStatistics {
        let mut contributions = current
            .map(|row| row.contributions.clone())
            .unwrap_or_default();
        contributions.insert(timestamp.clone(), entry.contribution);

        Self::from_contributions(
            entry.team.clone(),
            match_id.clone(),
            entry.opponent.clone(),
            contributions,
        )
    }

    /// The row without the contribution recorded at `timestamp`, or `None`
    /// when nothing would be left.
    #[must_use]
    pub fn retract(&self, timestamp: &Timestamp) -> Option<TeamStatistics> {
        let mut contributions = self.contributions.clone();
        contributions.remove(timestamp);
        if contributions.is_empty() {
            return None;
        }
        Some(Self::from_contributions(
            self.team_name.clone(),
            self.match_id.clone(),
            self.opponent.clone(),
            contributions,
        ))
    }

    /// Build a row whose counters are derived from `contributions`.
    ///
    /// `contributions` must not be empty; the earliest key becomes the date.
    #[must_use]
    pub fn from_contributions(
        team_name: TeamName,
        match_id: MatchId,
        opponent: TeamName,
        contributions: BTreeMap<Timestamp, Contribution>,
    ) -> TeamStatistics {
        let date = contributions
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| Timestamp::new(""));

        let (goals_scored, goals_conceded, fouls) =
            contributions
                .values()
                .fold((0u32, 0u32, 0u32), |(s, c, f), item| {
                    (
                        s.saturating_add(item.goals_scored),
                        c.saturating_add(item.goals_conceded),
                        f.saturating_add(item.fouls),
                    )
                });

        // Latest explicit declaration wins; otherwise the score decides.
        let result = contributions
            .values()
            .rev()
            .find_map(|item| item.outcome)
            .unwrap_or_else(|| MatchResult::from_goal_difference(goals_scored, goals_conceded));

        TeamStatistics {
            team_name,
            match_id,
            opponent,
            date,
            goals_scored,
            goals_conceded,
            fouls,
            result,
            contributions,
        }
    }

    #[must_use]
    pub fn wins(&self) -> u32 {
        u32::from(self.result == MatchResult::Win)
    }

    #[must_use]
    pub fn losses(&self) -> u32 {
        u32::from(self.result == MatchResult::Loss)
    }

    #[must_use]
    pub fn draws(&self) -> u32 {
        u32::from(self.result == MatchResult::Draw)
    }
}

/// Totals across every match row of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub total_matches: u32,
    pub total_wins: u32,
    pub total_draws: u32,
    pub total_losses: u32,
    pub total_goals_scored: u32,
    pub total_goals_conceded: u32,
    pub total_fouls: u32,
}

impl TeamSummary {
    #[must_use]
    pub fn from_rows(rows: &[TeamStatistics]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            total_matches: acc.total_matches.saturating_add(1),
            total_wins: acc.total_wins.saturating_add(row.wins()),
            total_draws: acc.total_draws.saturating_add(row.draws()),
            total_losses: acc.total_losses.saturating_add(row.losses()),
            total_goals_scored: acc.total_goals_scored.saturating_add(row.goals_scored),
            total_goals_conceded: acc.total_goals_conceded.saturating_add(row.goals_conceded),
            total_fouls: acc.total_fouls.saturating_add(row.fouls),
        })
    }
}
