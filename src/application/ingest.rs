//! Ingestion Service: validate a submission and write it to the Match Store.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::retry::RetryPolicy;
use crate::domain::{ChangeKind, MatchId, MatchRecord, MatchSubmission, Timestamp};
use crate::error::{Error, Result};
use crate::port::outbound::store::MatchStore;

/// Acknowledgement of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    /// `{match_id}_{timestamp}_{uuid}`.
    pub event_id: String,
    pub match_id: MatchId,
    pub timestamp: Timestamp,
    /// Whether the key was created or overwritten.
    pub change: ChangeKind,
}

pub struct IngestionService {
    store: Arc<dyn MatchStore>,
    retry: RetryPolicy,
    max_event_age: Duration,
}

impl IngestionService {
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, retry: RetryPolicy, max_event_age: Duration) -> Self {
        Self {
            store,
            retry,
            max_event_age,
        }
    }

    /// Validate and store one submission.
    ///
    /// Transient write failures are retried up to `retry.max_attempts`
    /// times. The whole write, retries included, is abandoned once
    /// `max_event_age` has passed, whichever limit comes first.
    ///
    /// # Errors
    /// [`Error::Validation`] for an incomplete submission, [`Error::Timeout`]
    /// when the write is abandoned, or the store error that ended it.
    pub async fn ingest(&self, submission: MatchSubmission) -> Result<IngestReceipt> {
        let record = MatchRecord::try_from(submission)?;

        let write = self
            .retry
            .run("match_store.put", || self.store.put(&record));
        let change = match tokio::time::timeout(self.max_event_age, write).await {
            Ok(result) => result?,
            Err(_) => {
                let after_ms = u64::try_from(self.max_event_age.as_millis()).unwrap_or(u64::MAX);
                error!(
                    match_id = %record.match_id,
                    timestamp = %record.timestamp,
                    after_ms,
                    "Match write abandoned"
                );
                return Err(Error::Timeout {
                    operation: "match write",
                    after_ms,
                });
            }
        };

        let event_id = format!("{}_{}_{}", record.match_id, record.timestamp, Uuid::new_v4());
        info!(
            match_id = %record.match_id,
            timestamp = %record.timestamp,
            team = %record.team,
            event_type = %record.event_type,
            change = %change,
            "Match record stored"
        );

        Ok(IngestReceipt {
            event_id,
            match_id: record.match_id,
            timestamp: record.timestamp,
            change,
        })
    }
}
