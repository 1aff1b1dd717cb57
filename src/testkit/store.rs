//! Store wrappers that inject failures and record traffic.
//!
//! [`FlakyStatisticsStore`] and [`FlakyMatchStore`] wrap the in-memory
//! stores. Failures are scripted per operation (and, for statistics, per
//! team) and consumed one per call, so "fail the first two upserts for
//! Bravo" reads exactly like that in a test.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::outbound::memory::match_store::MemoryMatchStore;
use crate::adapter::outbound::memory::statistics_store::MemoryStatisticsStore;
use crate::domain::{ChangeKind, MatchId, MatchKey, MatchRecord, TeamName, TeamStatistics};
use crate::error::{Result, StoreError};
use crate::port::outbound::store::{MatchStore, StatisticsStore};

/// Shorthand for a retryable failure.
pub fn transient(message: &str) -> StoreError {
    StoreError::Transient(message.to_string())
}

/// Shorthand for a non-retryable failure.
pub fn permanent(message: &str) -> StoreError {
    StoreError::Permanent(message.to_string())
}

#[derive(Default)]
struct Script {
    by_team: HashMap<TeamName, VecDeque<StoreError>>,
}

impl Script {
    fn push(&mut self, team: TeamName, errors: impl IntoIterator<Item = StoreError>) {
        self.by_team.entry(team).or_default().extend(errors);
    }

    fn next(&mut self, team: &TeamName) -> Option<StoreError> {
        self.by_team.get_mut(team)?.pop_front()
    }
}

/// Statistics Store with scripted per-team failures and an upsert log.
#[derive(Default)]
pub struct FlakyStatisticsStore {
    inner: MemoryStatisticsStore,
    get_failures: Mutex<Script>,
    upsert_failures: Mutex<Script>,
    upserts: Mutex<Vec<TeamStatistics>>,
    gets: AtomicU32,
    delay: Mutex<Option<Duration>>,
}

impl FlakyStatisticsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `upsert` calls for `team` with `errors`, in order.
    #[must_use]
    pub fn fail_upserts(self, team: &str, errors: impl IntoIterator<Item = StoreError>) -> Self {
        self.upsert_failures.lock().push(TeamName::new(team), errors);
        self
    }

    /// Fail the next `get` calls for `team` with `errors`, in order.
    #[must_use]
    pub fn fail_gets(self, team: &str, errors: impl IntoIterator<Item = StoreError>) -> Self {
        self.get_failures.lock().push(TeamName::new(team), errors);
        self
    }

    /// Sleep before every operation.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// Every row successfully written, in write order.
    #[must_use]
    pub fn upserts(&self) -> Vec<TeamStatistics> {
        self.upserts.lock().clone()
    }

    /// Successful writes of `team`'s rows.
    #[must_use]
    pub fn upsert_count(&self, team: &str) -> usize {
        self.upserts
            .lock()
            .iter()
            .filter(|row| row.team_name.as_str() == team)
            .count()
    }

    /// Number of `get` calls, failed ones included.
    #[must_use]
    pub fn get_count(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StatisticsStore for FlakyStatisticsStore {
    async fn upsert(&self, row: &TeamStatistics) -> Result<()> {
        self.pause().await;
        if let Some(err) = self.upsert_failures.lock().next(&row.team_name) {
            return Err(err.into());
        }
        self.inner.upsert(row).await?;
        self.upserts.lock().push(row.clone());
        Ok(())
    }

    async fn get(&self, team: &TeamName, match_id: &MatchId) -> Result<Option<TeamStatistics>> {
        self.pause().await;
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.get_failures.lock().next(team) {
            return Err(err.into());
        }
        self.inner.get(team, match_id).await
    }

    async fn list_team(&self, team: &TeamName) -> Result<Vec<TeamStatistics>> {
        self.inner.list_team(team).await
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<TeamStatistics>> {
        self.pause().await;
        self.inner.list_match(match_id).await
    }

    async fn delete(&self, team: &TeamName, match_id: &MatchId) -> Result<bool> {
        self.pause().await;
        self.inner.delete(team, match_id).await
    }
}

/// Match Store with scripted `put` failures and an optional write delay.
#[derive(Default)]
pub struct FlakyMatchStore {
    inner: MemoryMatchStore,
    put_failures: Mutex<VecDeque<StoreError>>,
    puts: AtomicU32,
    delay: Mutex<Option<Duration>>,
}

impl FlakyMatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `put` calls with `errors`, in order.
    #[must_use]
    pub fn fail_puts(self, errors: impl IntoIterator<Item = StoreError>) -> Self {
        self.put_failures.lock().extend(errors);
        self
    }

    /// Sleep before every `put`.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// Number of `put` calls, failed ones included.
    #[must_use]
    pub fn put_count(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchStore for FlakyMatchStore {
    async fn put(&self, record: &MatchRecord) -> Result<ChangeKind> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.put_failures.lock().pop_front() {
            return Err(err.into());
        }
        self.inner.put(record).await
    }

    async fn delete(&self, key: &MatchKey) -> Result<bool> {
        self.inner.delete(key).await
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<MatchRecord>> {
        self.inner.get(key).await
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<MatchRecord>> {
        self.inner.list_match(match_id).await
    }

    async fn list(&self) -> Result<Vec<MatchRecord>> {
        self.inner.list().await
    }
}
