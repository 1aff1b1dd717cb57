//! [`ChangeFeed`] doubles.
//!
//! - [`ScriptedFeed`] - a fixed queue of events, then end of feed.
//! - [`ChannelFeed`] - events pushed on demand through a [`FeedHandle`];
//!   the feed ends when every handle is dropped.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::ChangeEvent;
use crate::port::outbound::feed::ChangeFeed;

/// Feed that yields a pre-loaded list of events and then ends.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    events: VecDeque<ChangeEvent>,
}

impl ScriptedFeed {
    pub fn new(events: impl IntoIterator<Item = ChangeEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl ChangeFeed for ScriptedFeed {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.pop_front()
    }

    fn feed_name(&self) -> &'static str {
        "scripted"
    }
}

/// Sending side of a [`ChannelFeed`].
#[derive(Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl FeedHandle {
    /// Push an event. Returns false once the feed was dropped.
    pub fn push(&self, event: ChangeEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Feed backed by an unbounded channel.
pub struct ChannelFeed {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChannelFeed {
    #[must_use]
    pub fn new() -> (Self, FeedHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, FeedHandle { tx })
    }
}

#[async_trait]
impl ChangeFeed for ChannelFeed {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    fn feed_name(&self) -> &'static str {
        "channel"
    }
}
