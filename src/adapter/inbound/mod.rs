//! Inbound adapters (driving side): HTTP API and CLI.

pub mod cli;
pub mod http;
