//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement them to integrate with the two record stores and
//! the Match Store's change feed.
//!
//! ```text
//!   Ingestion ──► MatchStore ──► ChangeFeed ──► AggregationEngine ──► StatisticsStore
//!                     ▲                                                      ▲
//!                     └──────────────────── Query ───────────────────────────┘
//! ```

pub mod outbound;
