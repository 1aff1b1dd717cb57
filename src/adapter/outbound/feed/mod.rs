//! Change feed adapters.
//!
//! [`ChangeLog`] is the in-process stream behind the Match Store; the
//! [`PublishingMatchStore`] decorator feeds it.

pub mod log;
pub mod publishing;

pub use log::{ChangeLog, ChangeLogReader, Retention};
pub use publishing::PublishingMatchStore;
