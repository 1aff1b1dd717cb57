//! In-memory store adapters.
//!
//! Process-local implementations of both stores, used by the `memory`
//! storage backend and throughout the test suite.

pub mod match_store;
pub mod statistics_store;
