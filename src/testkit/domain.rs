//! Builders for match records and change events used across tests.

use serde_json::json;

use crate::domain::{ChangeEvent, ChangeKind, MatchKey, MatchRecord};

/// A record of `event_type` by `team` against `opponent`.
pub fn record(match_id: &str, timestamp: &str, team: &str, opponent: &str, event_type: &str) -> MatchRecord {
    MatchRecord::new(MatchKey::new(match_id, timestamp), team, opponent, event_type)
}

/// `team` scores against `opponent`.
pub fn goal(match_id: &str, timestamp: &str, team: &str, opponent: &str) -> MatchRecord {
    record(match_id, timestamp, team, opponent, "goal")
        .with_details(json!({"player": {"name": "Striker"}, "goal_type": "open_play", "minute": 10}))
}

/// `team` commits a foul.
pub fn foul(match_id: &str, timestamp: &str, team: &str, opponent: &str) -> MatchRecord {
    record(match_id, timestamp, team, opponent, "foul")
}

/// A declared result; `winner = None` is a draw.
pub fn result(
    match_id: &str,
    timestamp: &str,
    team: &str,
    opponent: &str,
    winner: Option<&str>,
) -> MatchRecord {
    let details = match winner {
        Some(winner) => json!({ "winner": winner }),
        None => json!({ "outcome": "draw" }),
    };
    record(match_id, timestamp, team, opponent, "result").with_details(details)
}

/// Change event carrying `record` as its new image.
pub fn change(sequence: u64, kind: ChangeKind, record: &MatchRecord) -> ChangeEvent {
    ChangeEvent::new(sequence, kind, record.key(), record.to_image().ok())
}

pub fn insert(sequence: u64, record: &MatchRecord) -> ChangeEvent {
    change(sequence, ChangeKind::Insert, record)
}

pub fn modify(sequence: u64, record: &MatchRecord) -> ChangeEvent {
    change(sequence, ChangeKind::Modify, record)
}

/// Removal of `record`'s key (no image).
pub fn remove(sequence: u64, record: &MatchRecord) -> ChangeEvent {
    ChangeEvent::new(sequence, ChangeKind::Remove, record.key(), None)
}

/// Insert event whose image lacks everything but the match id.
pub fn undecodable(sequence: u64, match_id: &str, timestamp: &str) -> ChangeEvent {
    ChangeEvent::new(
        sequence,
        ChangeKind::Insert,
        MatchKey::new(match_id, timestamp),
        Some(json!({ "match_id": match_id })),
    )
}
