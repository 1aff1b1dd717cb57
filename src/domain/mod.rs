//! Store-agnostic domain logic: records, change events, statistics rows.

pub mod error;
pub mod event;
pub mod id;
pub mod outcome;
pub mod record;
pub mod statistics;

pub use event::{ChangeEvent, ChangeKind};
pub use id::{MatchId, TeamName, Timestamp};
pub use outcome::{Contribution, EventKind, MatchOutcome, TeamContribution};
pub use record::{MatchKey, MatchRecord, MatchSubmission};
pub use statistics::{MatchResult, TeamStatistics, TeamSummary};
