//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the Match Store and the
//! Statistics Store using Diesel ORM.

pub mod database;
pub mod match_store;
pub mod statistics_store;
