//! Partitioned consumer loop over a change feed.
//!
//! Events are routed by `match_id` to a fixed set of workers over bounded
//! channels. A worker finishes (or gives up on) one event before it takes
//! the next, so revisions of the same match are applied in feed order while
//! different matches proceed in parallel.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::engine::{AggregationEngine, Disposition};
use crate::domain::{ChangeEvent, MatchId};
use crate::infrastructure::config::aggregation::AggregationConfig;
use crate::port::outbound::feed::ChangeFeed;

/// Counters accumulated over a dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Events read from the feed.
    pub received: u64,
    /// Events that wrote at least one row.
    pub applied: u64,
    /// Events aggregated without any write (rows already current).
    pub unchanged: u64,
    /// Events dropped by the change kind filter.
    pub filtered: u64,
    /// Undecodable events.
    pub skipped: u64,
    /// Failed deliveries that were attempted again.
    pub redelivered: u64,
    /// Events discarded after their last delivery attempt.
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    applied: AtomicU64,
    unchanged: AtomicU64,
    filtered: AtomicU64,
    skipped: AtomicU64,
    redelivered: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, disposition: &Disposition) {
        match disposition {
            Disposition::Applied { .. } if disposition.wrote() => Self::bump(&self.applied),
            Disposition::Applied { .. } => Self::bump(&self.unchanged),
            Disposition::Filtered { .. } => Self::bump(&self.filtered),
            Disposition::Skipped { .. } => Self::bump(&self.skipped),
        }
    }

    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            redelivered: self.redelivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// How failed invocations are delivered again.
#[derive(Debug, Clone, Copy)]
struct Redelivery {
    max_attempts: u32,
    delay: Duration,
}

/// Worker pool fed from a [`ChangeFeed`].
pub struct Dispatcher {
    engine: Arc<AggregationEngine>,
    workers: usize,
    channel_capacity: usize,
    redelivery: Redelivery,
    counters: Arc<Counters>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(engine: Arc<AggregationEngine>, config: &AggregationConfig) -> Self {
        Self {
            engine,
            workers: config.workers.max(1),
            channel_capacity: config.channel_capacity.max(1),
            redelivery: Redelivery {
                max_attempts: config.max_delivery_attempts.max(1),
                delay: config.redelivery_delay(),
            },
            counters: Arc::new(Counters::default()),
        }
    }

    /// Worker index owning `match_id`.
    #[must_use]
    pub fn partition(match_id: &MatchId, workers: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        match_id.hash(&mut hasher);
        (hasher.finish() % workers.max(1) as u64) as usize
    }

    /// Consume `feed` until it ends, then drain every worker.
    pub async fn run<F: ChangeFeed>(self, mut feed: F) -> DispatchStats {
        let mut inboxes = Vec::with_capacity(self.workers);
        let mut handles = Vec::with_capacity(self.workers);
        for worker in 0..self.workers {
            let (tx, rx) = mpsc::channel(self.channel_capacity);
            inboxes.push(tx);
            handles.push(tokio::spawn(work(
                worker,
                rx,
                Arc::clone(&self.engine),
                self.redelivery,
                Arc::clone(&self.counters),
            )));
        }

        info!(
            feed = feed.feed_name(),
            workers = self.workers,
            channel_capacity = self.channel_capacity,
            max_delivery_attempts = self.redelivery.max_attempts,
            "Dispatcher started"
        );

        while let Some(event) = feed.next_event().await {
            Counters::bump(&self.counters.received);
            let worker = Self::partition(&event.key.match_id, self.workers);
            // Bounded send: a full inbox blocks the reader instead of dropping.
            if inboxes[worker].send(event).await.is_err() {
                error!(worker, "Worker inbox closed, stopping dispatcher");
                break;
            }
        }

        drop(inboxes);
        for (worker, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = joined {
                error!(worker, error = %e, "Worker task failed");
            }
        }

        let stats = self.counters.snapshot();
        info!(
            received = stats.received,
            applied = stats.applied,
            unchanged = stats.unchanged,
            filtered = stats.filtered,
            skipped = stats.skipped,
            redelivered = stats.redelivered,
            failed = stats.failed,
            "Dispatcher stopped"
        );
        stats
    }
}

async fn work(
    worker: usize,
    mut inbox: mpsc::Receiver<ChangeEvent>,
    engine: Arc<AggregationEngine>,
    redelivery: Redelivery,
    counters: Arc<Counters>,
) {
    debug!(worker, "Worker started");
    while let Some(event) = inbox.recv().await {
        deliver(worker, &event, &engine, redelivery, &counters).await;
    }
    debug!(worker, "Worker drained");
}

async fn deliver(
    worker: usize,
    event: &ChangeEvent,
    engine: &AggregationEngine,
    redelivery: Redelivery,
    counters: &Counters,
) {
    let mut attempt = 1;
    loop {
        match engine.handle(event).await {
            Ok(disposition) => {
                counters.record(&disposition);
                return;
            }
            Err(e) if attempt < redelivery.max_attempts => {
                Counters::bump(&counters.redelivered);
                warn!(
                    worker,
                    sequence = event.sequence,
                    match_id = %event.key.match_id,
                    timestamp = %event.key.timestamp,
                    attempt,
                    error = %e,
                    "Invocation failed, redelivering"
                );
                sleep(redelivery.delay).await;
                attempt += 1;
            }
            Err(e) => {
                Counters::bump(&counters.failed);
                error!(
                    worker,
                    sequence = event.sequence,
                    event_id = %event.event_id,
                    match_id = %event.key.match_id,
                    timestamp = %event.key.timestamp,
                    attempts = attempt,
                    error = %e,
                    "Event discarded after final delivery attempt"
                );
                return;
            }
        }
    }
}
