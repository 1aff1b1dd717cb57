//! Single-invocation aggregation.
//!
//! An invocation turns one change event into at most one upsert per
//! participating team. It reads only the event's new image and the stored
//! rows of the affected match, and keeps nothing between
//! calls, so any number of engines may run side by side and a restarted
//! engine behaves exactly like a fresh one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::filter::EventFilter;
use crate::application::retry::RetryPolicy;
use crate::domain::error::DecodeError;
use crate::domain::outcome::decode;
use crate::domain::{ChangeEvent, ChangeKind, MatchRecord, TeamContribution, TeamName, TeamStatistics};
use crate::error::{Error, Result};
use crate::port::outbound::store::StatisticsStore;

/// What an invocation did with its event.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// The event was aggregated. `teams` were written, `unchanged` already
    /// held the computed row, `retracted` lost the contribution a correction
    /// took away from them.
    Applied {
        teams: Vec<TeamName>,
        unchanged: Vec<TeamName>,
        retracted: Vec<TeamName>,
    },
    /// The change kind is not admitted by the filter.
    Filtered { kind: ChangeKind },
    /// The image could not be decoded; the event is dropped.
    Skipped { reason: DecodeError },
}

impl Disposition {
    /// True when at least one row was written.
    #[must_use]
    pub fn wrote(&self) -> bool {
        match self {
            Disposition::Applied {
                teams, retracted, ..
            } => !teams.is_empty() || !retracted.is_empty(),
            _ => false,
        }
    }
}

enum TeamWrite {
    Written,
    Unchanged,
}

/// Transforms change events into Statistics Store upserts.
pub struct AggregationEngine {
    statistics: Arc<dyn StatisticsStore>,
    filter: EventFilter,
    retry: RetryPolicy,
    invocation_timeout: Duration,
}

impl AggregationEngine {
    #[must_use]
    pub fn new(
        statistics: Arc<dyn StatisticsStore>,
        filter: EventFilter,
        retry: RetryPolicy,
        invocation_timeout: Duration,
    ) -> Self {
        Self {
            statistics,
            filter,
            retry,
            invocation_timeout,
        }
    }

    /// Process one event under the invocation deadline.
    ///
    /// # Errors
    /// Returns [`Error::Timeout`] when the deadline passes, or the store
    /// error that ended the invocation (permanent, or transient after the
    /// retry budget is spent). Decode failures are not errors; they yield
    /// [`Disposition::Skipped`].
    pub async fn handle(&self, event: &ChangeEvent) -> Result<Disposition> {
        match tokio::time::timeout(self.invocation_timeout, self.process(event)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation: "aggregation invocation",
                after_ms: u64::try_from(self.invocation_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn process(&self, event: &ChangeEvent) -> Result<Disposition> {
        if !self.filter.admits(event.kind) {
            debug!(
                sequence = event.sequence,
                kind = %event.kind,
                key = %event.key,
                "Change kind filtered"
            );
            return Ok(Disposition::Filtered { kind: event.kind });
        }

        let outcome = match decode(event) {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(
                    sequence = event.sequence,
                    event_id = %event.event_id,
                    key = %event.key,
                    error = %reason,
                    "Undecodable change event skipped"
                );
                return Ok(Disposition::Skipped { reason });
            }
        };

        let mut teams = Vec::with_capacity(2);
        let mut unchanged = Vec::new();
        // Each team is read, computed and written on its own so a retry on
        // one never repeats the other's write.
        for entry in &outcome.contributions {
            match self.apply_team(&outcome.record, entry).await? {
                TeamWrite::Written => teams.push(entry.team.clone()),
                TeamWrite::Unchanged => unchanged.push(entry.team.clone()),
            }
        }
        let retracted = self
            .retract_stale(&outcome.record, &outcome.contributions)
            .await?;

        info!(
            sequence = event.sequence,
            match_id = %event.key.match_id,
            timestamp = %event.key.timestamp,
            kind = %event.kind,
            written = teams.len(),
            unchanged = unchanged.len(),
            retracted = retracted.len(),
            "Change event aggregated"
        );
        Ok(Disposition::Applied {
            teams,
            unchanged,
            retracted,
        })
    }

    /// Withdraw this record's earlier contribution from teams it no longer
    /// names. A row left without contributions is deleted.
    async fn retract_stale(
        &self,
        record: &MatchRecord,
        current: &[TeamContribution],
    ) -> Result<Vec<TeamName>> {
        let rows = self
            .retry
            .run("statistics.list_match", || {
                self.statistics.list_match(&record.match_id)
            })
            .await?;

        let mut retracted = Vec::new();
        for row in rows {
            let named = current.iter().any(|entry| entry.team == row.team_name);
            if named || !row.contributions.contains_key(&record.timestamp) {
                continue;
            }

            match row.retract(&record.timestamp) {
                Some(next) => {
                    self.retry
                        .run("statistics.upsert", || self.statistics.upsert(&next))
                        .await?;
                }
                None => {
                    self.retry
                        .run("statistics.delete", || {
                            self.statistics.delete(&row.team_name, &row.match_id)
                        })
                        .await?;
                }
            }
            info!(
                team = %row.team_name,
                match_id = %record.match_id,
                timestamp = %record.timestamp,
                "Stale contribution retracted"
            );
            retracted.push(row.team_name);
        }
        Ok(retracted)
    }

    async fn apply_team(&self, record: &MatchRecord, entry: &TeamContribution) -> Result<TeamWrite> {
        let current = self
            .retry
            .run("statistics.get", || {
                self.statistics.get(&entry.team, &record.match_id)
            })
            .await?;

        let next = TeamStatistics::apply(current.as_ref(), &record.match_id, &record.timestamp, entry);
        if current.as_ref() == Some(&next) {
            debug!(
                team = %entry.team,
                match_id = %record.match_id,
                "Statistics row already current"
            );
            return Ok(TeamWrite::Unchanged);
        }

        self.retry
            .run("statistics.upsert", || self.statistics.upsert(&next))
            .await?;
        debug!(
            team = %entry.team,
            match_id = %record.match_id,
            result = %next.result,
            goals_scored = next.goals_scored,
            goals_conceded = next.goals_conceded,
            fouls = next.fouls,
            "Statistics row written"
        );
        Ok(TeamWrite::Written)
    }
}
