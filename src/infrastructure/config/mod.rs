//! Infrastructure configuration modules.

pub mod aggregation;
pub mod feed;
pub mod logging;
pub mod retry;
pub mod service;
pub mod settings;
pub mod storage;
