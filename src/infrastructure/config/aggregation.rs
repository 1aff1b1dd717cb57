//! Aggregation pipeline configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::ChangeKind;
use crate::port::outbound::feed::StartingPosition;

/// Worker pool, filter and redelivery settings for the aggregation pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Number of partition workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Capacity of each worker's inbox.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Where the feed reader starts. `latest` skips any backlog.
    #[serde(default)]
    pub starting_position: StartingPosition,
    /// Change kinds that reach the engine.
    #[serde(default = "default_event_kinds")]
    pub event_kinds: Vec<ChangeKind>,
    /// Deadline for a single invocation (milliseconds).
    #[serde(default = "default_invocation_timeout_ms")]
    pub invocation_timeout_ms: u64,
    /// Attempts per event, including the first delivery.
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,
    /// Pause between deliveries of a failed event (milliseconds).
    #[serde(default = "default_redelivery_delay_ms")]
    pub redelivery_delay_ms: u64,
}

const fn default_workers() -> usize {
    4
}

const fn default_channel_capacity() -> usize {
    1_024
}

fn default_event_kinds() -> Vec<ChangeKind> {
    vec![ChangeKind::Insert, ChangeKind::Modify]
}

const fn default_invocation_timeout_ms() -> u64 {
    30_000
}

const fn default_max_delivery_attempts() -> u32 {
    3
}

const fn default_redelivery_delay_ms() -> u64 {
    1_000
}

impl AggregationConfig {
    #[must_use]
    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_millis(self.invocation_timeout_ms)
    }

    #[must_use]
    pub fn redelivery_delay(&self) -> Duration {
        Duration::from_millis(self.redelivery_delay_ms)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            channel_capacity: default_channel_capacity(),
            starting_position: StartingPosition::default(),
            event_kinds: default_event_kinds(),
            invocation_timeout_ms: default_invocation_timeout_ms(),
            max_delivery_attempts: default_max_delivery_attempts(),
            redelivery_delay_ms: default_redelivery_delay_ms(),
        }
    }
}
