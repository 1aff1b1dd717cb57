//! Change-event-driven aggregation pipeline.
//!
//! - [`filter`] - which change kinds are processed
//! - [`engine`] - one event in, per-team statistics upserts out
//! - [`dispatcher`] - partitioned worker pool and redelivery policy

pub mod dispatcher;
pub mod engine;
pub mod filter;

pub use dispatcher::{DispatchStats, Dispatcher};
pub use engine::{AggregationEngine, Disposition};
pub use filter::EventFilter;
