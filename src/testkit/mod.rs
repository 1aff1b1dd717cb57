//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`feed`] - [`ChangeFeed`](crate::port::outbound::feed::ChangeFeed) doubles:
//!   `ScriptedFeed`, `ChannelFeed`.
//! - [`store`] - Statistics/Match Store wrappers that inject failures and
//!   record writes.
//! - [`domain`] - Builders for match records and change events.
//! - [`config`] - Canonical fast test configuration.

pub mod config;
pub mod domain;
pub mod feed;
pub mod store;
