//! In-process change log.
//!
//! The log is an append-only sequence of [`ChangeEvent`]s with a bounded
//! retention window. Readers keep their own cursor; a reader that falls
//! behind the window silently loses the trimmed events (they are logged,
//! never replayed).

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::domain::{ChangeEvent, ChangeKind, MatchKey};
use crate::port::outbound::feed::{ChangeFeed, StartingPosition};

/// How long and how many events the log keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub max_age: Duration,
    pub max_events: usize,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            max_events: 100_000,
        }
    }
}

#[derive(Debug, Default)]
struct LogState {
    entries: VecDeque<ChangeEvent>,
    next_sequence: u64,
    closed: bool,
}

impl LogState {
    fn first_sequence(&self) -> u64 {
        self.entries
            .front()
            .map_or(self.next_sequence, |e| e.sequence)
    }
}

/// Append-only change log shared between the Match Store and its readers.
#[derive(Debug)]
pub struct ChangeLog {
    state: Mutex<LogState>,
    notify: Notify,
    retention: Retention,
}

impl ChangeLog {
    #[must_use]
    pub fn new(retention: Retention) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            notify: Notify::new(),
            retention,
        }
    }

    /// Append an event and wake waiting readers.
    pub fn publish(&self, kind: ChangeKind, key: MatchKey, new_image: Option<Value>) -> ChangeEvent {
        let event = {
            let mut state = self.state.lock();
            let event = ChangeEvent::new(state.next_sequence, kind, key, new_image);
            state.next_sequence += 1;
            state.entries.push_back(event.clone());
            self.trim(&mut state);
            event
        };

        debug!(
            sequence = event.sequence,
            kind = %event.kind,
            key = %event.key,
            "Change published"
        );
        self.notify.notify_waiters();
        event
    }

    /// Open a reader at the given position.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>, position: StartingPosition) -> ChangeLogReader {
        let cursor = {
            let mut state = self.state.lock();
            self.trim(&mut state);
            match position {
                StartingPosition::Latest => state.next_sequence,
                StartingPosition::Earliest => state.first_sequence(),
            }
        };
        debug!(%position, cursor, "Change log reader opened");
        ChangeLogReader {
            log: Arc::clone(self),
            cursor,
        }
    }

    /// Stop accepting waits; readers return `None` once drained.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_waiters();
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn trim(&self, state: &mut LogState) {
        while state.entries.len() > self.retention.max_events {
            state.entries.pop_front();
        }

        let now = Utc::now();
        while let Some(front) = state.entries.front() {
            let age = now
                .signed_duration_since(front.recorded_at)
                .to_std()
                .unwrap_or_default();
            if age <= self.retention.max_age {
                break;
            }
            state.entries.pop_front();
        }
    }
}

/// A cursor over a [`ChangeLog`].
pub struct ChangeLogReader {
    log: Arc<ChangeLog>,
    cursor: u64,
}

impl ChangeLogReader {
    fn poll_entry(&mut self) -> Next {
        let mut state = self.log.state.lock();
        self.log.trim(&mut state);

        let first = state.first_sequence();
        if self.cursor < first {
            warn!(
                lost = first - self.cursor,
                from = self.cursor,
                to = first,
                "Reader fell behind the retention window; events lost"
            );
            self.cursor = first;
        }

        let index = usize::try_from(self.cursor - first).unwrap_or(usize::MAX);
        if let Some(event) = state.entries.get(index) {
            self.cursor += 1;
            return Next::Ready(event.clone());
        }
        if state.closed {
            Next::Closed
        } else {
            Next::Pending
        }
    }
}

enum Next {
    Ready(ChangeEvent),
    Pending,
    Closed,
}

#[async_trait]
impl ChangeFeed for ChangeLogReader {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        let log = Arc::clone(&self.log);
        loop {
            // Register before checking so a publish in between is not missed.
            let notified = log.notify.notified();
            match self.poll_entry() {
                Next::Ready(event) => return Some(event),
                Next::Closed => return None,
                Next::Pending => notified.await,
            }
        }
    }

    fn feed_name(&self) -> &'static str {
        "change-log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(t: &str) -> MatchKey {
        MatchKey::new("m1", t)
    }

    #[tokio::test]
    async fn latest_reader_skips_existing_backlog() {
        let log = Arc::new(ChangeLog::new(Retention::default()));
        log.publish(ChangeKind::Insert, key("t1"), None);

        let mut reader = log.subscribe(StartingPosition::Latest);
        log.publish(ChangeKind::Insert, key("t2"), None);
        log.close();

        let event = reader.next_event().await.unwrap();
        assert_eq!(event.key, key("t2"));
        assert!(reader.next_event().await.is_none());
    }

    #[tokio::test]
    async fn earliest_reader_replays_retained_backlog() {
        let log = Arc::new(ChangeLog::new(Retention::default()));
        log.publish(ChangeKind::Insert, key("t1"), None);
        log.publish(ChangeKind::Modify, key("t1"), None);
        log.close();

        let mut reader = log.subscribe(StartingPosition::Earliest);
        assert_eq!(reader.next_event().await.unwrap().sequence, 0);
        assert_eq!(reader.next_event().await.unwrap().kind, ChangeKind::Modify);
        assert!(reader.next_event().await.is_none());
    }

    #[tokio::test]
    async fn reader_behind_window_jumps_forward() {
        let log = Arc::new(ChangeLog::new(Retention {
            max_events: 2,
            ..Retention::default()
        }));
        let mut reader = log.subscribe(StartingPosition::Earliest);
        for t in ["t1", "t2", "t3", "t4"] {
            log.publish(ChangeKind::Insert, key(t), None);
        }
        log.close();

        assert_eq!(log.len(), 2);
        assert_eq!(reader.next_event().await.unwrap().key, key("t3"));
        assert_eq!(reader.next_event().await.unwrap().key, key("t4"));
        assert!(reader.next_event().await.is_none());
    }

    #[tokio::test]
    async fn waiting_reader_wakes_on_publish() {
        let log = Arc::new(ChangeLog::new(Retention::default()));
        let mut reader = log.subscribe(StartingPosition::Latest);

        let publisher = Arc::clone(&log);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            publisher.publish(ChangeKind::Insert, MatchKey::new("m9", "t1"), None);
        });

        let event = tokio::time::timeout(Duration::from_secs(2), reader.next_event())
            .await
            .expect("reader should wake")
            .unwrap();
        assert_eq!(event.key.match_id.as_str(), "m9");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn sequences_increase_monotonically() {
        let log = ChangeLog::new(Retention::default());
        let a = log.publish(ChangeKind::Insert, key("t1"), None);
        let b = log.publish(ChangeKind::Insert, key("t2"), None);
        assert_eq!(b.sequence, a.sequence + 1);
    }

    #[tokio::test]
    async fn expired_events_are_trimmed() {
        let log = ChangeLog::new(Retention {
            max_age: Duration::ZERO,
            max_events: 10,
        });
        log.publish(ChangeKind::Insert, key("t1"), None);
        tokio::time::sleep(Duration::from_millis(5)).await;
        log.publish(ChangeKind::Insert, key("t2"), None);
        assert!(log.len() <= 1);
    }
}
