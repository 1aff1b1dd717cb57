//! HTTP API (axum).
//!
//! | route                              | handler                     |
//! |------------------------------------|-----------------------------|
//! | `POST /ingest`                     | Ingestion Service           |
//! | `GET /matches`                     | match list                  |
//! | `GET /matches/:match_id`           | match detail                |
//! | `GET /matches/:match_id/statistics`| per-match totals            |
//! | `GET /teams/:team_name/statistics` | team rows and totals        |
//! | `GET /health`                      | liveness                    |
//!
//! Every body is JSON with a `status` of `success` or `error`.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{create_router, ApiState};
