//! Matchstats - sports match ingestion with change-feed driven team
//! statistics.
//!
//! Match records are written to a Match Store keyed by
//! `(match_id, timestamp)`. Every write is published on the store's change
//! feed; an aggregation pipeline consumes that feed and maintains one
//! statistics row per `(team, match)` in a separate Statistics Store. The
//! HTTP API ingests records and serves both stores back.
//!
//! # Architecture
//!
//! - **`domain`** - Records, change events, outcome decoding and the
//!   idempotent statistics row
//! - **`port`** - Store and change feed traits
//! - **`adapter`** - SQLite and in-memory stores, the change log, HTTP API
//!   and CLI
//! - **`application`** - Ingestion, aggregation and query services
//! - **`infrastructure`** - Configuration, wiring and the service runtime
//!
//! # Delivery
//!
//! The change feed delivers at least once and in write order per match.
//! Statistics rows remember which record produced each contribution, so a
//! redelivered or corrected record replaces its earlier effect instead of
//! adding to it.
//!
//! # Features
//!
//! - `testkit` - Test doubles and builders for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
