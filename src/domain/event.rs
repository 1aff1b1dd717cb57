//! Change feed events emitted by the Match Store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::MatchKey;

/// Kind of mutation that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// A key written for the first time.
    Insert,
    /// An existing key overwritten.
    Modify,
    /// A key deleted.
    Remove,
}

impl ChangeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Modify => "modify",
            ChangeKind::Remove => "remove",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" => Ok(ChangeKind::Insert),
            "modify" => Ok(ChangeKind::Modify),
            "remove" => Ok(ChangeKind::Remove),
            other => Err(format!("unknown change kind '{other}'")),
        }
    }
}

/// A single change notification.
///
/// `new_image` holds the record document after the write; it is `None` for
/// removals. `sequence` is the feed position and increases with write order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub event_id: String,
    pub sequence: u64,
    pub kind: ChangeKind,
    pub key: MatchKey,
    pub new_image: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create an event with a fresh id and the current time.
    pub fn new(sequence: u64, kind: ChangeKind, key: MatchKey, new_image: Option<Value>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            kind,
            key,
            new_image,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_parses_case_insensitively() {
        assert_eq!("INSERT".parse::<ChangeKind>().unwrap(), ChangeKind::Insert);
        assert_eq!("Modify".parse::<ChangeKind>().unwrap(), ChangeKind::Modify);
        assert!("truncate".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn events_get_distinct_ids() {
        let key = MatchKey::new("m1", "t1");
        let a = ChangeEvent::new(1, ChangeKind::Insert, key.clone(), None);
        let b = ChangeEvent::new(1, ChangeKind::Insert, key, None);
        assert_ne!(a.event_id, b.event_id);
    }
}
