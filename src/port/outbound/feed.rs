//! Change feed port.
//!
//! A feed yields [`ChangeEvent`]s in write order per match. Delivery is
//! at-least-once: consumers must tolerate duplicates.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ChangeEvent;

/// Where a new feed reader begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartingPosition {
    /// Only events written after the reader was opened.
    #[default]
    Latest,
    /// The oldest event still inside the retention window.
    Earliest,
}

impl fmt::Display for StartingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartingPosition::Latest => f.write_str("latest"),
            StartingPosition::Earliest => f.write_str("earliest"),
        }
    }
}

impl FromStr for StartingPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(StartingPosition::Latest),
            "earliest" | "trim_horizon" => Ok(StartingPosition::Earliest),
            other => Err(format!("unknown starting position '{other}'")),
        }
    }
}

/// A reader over a store's change feed.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Wait for the next event. Returns `None` once the feed is closed and
    /// drained.
    async fn next_event(&mut self) -> Option<ChangeEvent>;

    /// Feed name for logging.
    fn feed_name(&self) -> &'static str;
}

#[async_trait]
impl<F: ChangeFeed + ?Sized> ChangeFeed for Box<F> {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        (**self).next_event().await
    }

    fn feed_name(&self) -> &'static str {
        (**self).feed_name()
    }
}
