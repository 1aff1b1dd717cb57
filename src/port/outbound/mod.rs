//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the externally owned stores and the change feed
//! the aggregation pipeline depends on.

pub mod feed;
pub mod store;
