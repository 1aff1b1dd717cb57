//! CLI module graph.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod output;
pub mod serve;
pub mod team;
