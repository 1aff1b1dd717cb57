//! Extraction of per-team contributions from a change event image.
//!
//! This is the only place that interprets `event_type` and `event_details`.
//! Everything here is pure: the same image always yields the same outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DecodeError;
use super::event::ChangeEvent;
use super::id::TeamName;
use super::record::MatchRecord;
use super::statistics::MatchResult;

const REQUIRED_IMAGE_FIELDS: [&str; 5] = ["match_id", "timestamp", "team", "opponent", "event_type"];

/// Recognized event types. Anything else is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Goal,
    Foul,
    Result,
    Other,
}

impl EventKind {
    #[must_use]
    pub fn parse(event_type: &str) -> Self {
        match event_type.trim().to_ascii_lowercase().as_str() {
            "goal" => EventKind::Goal,
            "foul" => EventKind::Foul,
            "result" => EventKind::Result,
            _ => EventKind::Other,
        }
    }
}

/// What one record adds to one team's row for that match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub goals_conceded: u32,
    #[serde(default)]
    pub fouls: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MatchResult>,
}

/// A contribution addressed to a specific team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamContribution {
    pub team: TeamName,
    pub opponent: TeamName,
    pub contribution: Contribution,
}

/// Structured form of a decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub record: MatchRecord,
    pub contributions: [TeamContribution; 2],
}

impl MatchOutcome {
    /// Teams whose rows this outcome touches, acting team first.
    pub fn teams(&self) -> impl Iterator<Item = &TeamName> {
        self.contributions.iter().map(|c| &c.team)
    }
}

/// Decode the new image of an insert/modify event.
///
/// # Errors
/// Returns a [`DecodeError`] for a missing or malformed image, an image whose
/// key disagrees with the event key, or unusable event details.
pub fn decode(event: &ChangeEvent) -> Result<MatchOutcome, DecodeError> {
    let image = event.new_image.as_ref().ok_or(DecodeError::MissingImage)?;
    let object = image
        .as_object()
        .ok_or_else(|| DecodeError::Malformed("image is not a JSON object".into()))?;

    for field in REQUIRED_IMAGE_FIELDS {
        let present = object
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.trim().is_empty());
        if !present {
            return Err(DecodeError::MissingField { field });
        }
    }

    let record: MatchRecord =
        serde_json::from_value(image.clone()).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if record.key() != event.key {
        return Err(DecodeError::KeyMismatch {
            image: record.key().to_string(),
            event: event.key.to_string(),
        });
    }

    let contributions = contributions(&record)?;
    Ok(MatchOutcome {
        record,
        contributions,
    })
}

/// Split a record into the acting team's and the opponent's contribution.
///
/// # Errors
/// Returns a [`DecodeError`] when the details cannot be interpreted.
pub fn contributions(record: &MatchRecord) -> Result<[TeamContribution; 2], DecodeError> {
    let details = record
        .event_details
        .as_object()
        .ok_or_else(|| DecodeError::InvalidDetails("event_details is not an object".into()))?;

    let (team, opponent) = match EventKind::parse(&record.event_type) {
        EventKind::Goal => (
            Contribution {
                goals_scored: 1,
                ..Contribution::default()
            },
            Contribution {
                goals_conceded: 1,
                ..Contribution::default()
            },
        ),
        EventKind::Foul => (
            Contribution {
                fouls: 1,
                ..Contribution::default()
            },
            Contribution::default(),
        ),
        EventKind::Result => {
            let (mine, theirs) = declared_result(record, details)?;
            (
                Contribution {
                    outcome: Some(mine),
                    ..Contribution::default()
                },
                Contribution {
                    outcome: Some(theirs),
                    ..Contribution::default()
                },
            )
        }
        EventKind::Other => (Contribution::default(), Contribution::default()),
    };

    Ok([
        TeamContribution {
            team: record.team.clone(),
            opponent: record.opponent.clone(),
            contribution: team,
        },
        TeamContribution {
            team: record.opponent.clone(),
            opponent: record.team.clone(),
            contribution: opponent,
        },
    ])
}

fn declared_result(
    record: &MatchRecord,
    details: &serde_json::Map<String, Value>,
) -> Result<(MatchResult, MatchResult), DecodeError> {
    if details
        .get("outcome")
        .and_then(Value::as_str)
        .is_some_and(|o| o.eq_ignore_ascii_case("draw"))
    {
        return Ok((MatchResult::Draw, MatchResult::Draw));
    }

    match details.get("winner") {
        None | Some(Value::Null) => Ok((MatchResult::Draw, MatchResult::Draw)),
        Some(Value::String(winner)) if winner == record.team.as_str() => {
            Ok((MatchResult::Win, MatchResult::Loss))
        }
        Some(Value::String(winner)) if winner == record.opponent.as_str() => {
            Ok((MatchResult::Loss, MatchResult::Win))
        }
        Some(Value::String(winner)) => Err(DecodeError::UnknownWinner {
            winner: winner.clone(),
            team: record.team.to_string(),
            opponent: record.opponent.to_string(),
        }),
        Some(other) => Err(DecodeError::InvalidDetails(format!(
            "winner must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::ChangeKind;
    use crate::domain::record::MatchKey;
    use serde_json::json;

    fn event_for(record: &MatchRecord) -> ChangeEvent {
        ChangeEvent::new(
            1,
            ChangeKind::Insert,
            record.key(),
            Some(record.to_image().unwrap()),
        )
    }

    fn record(event_type: &str, details: Value) -> MatchRecord {
        MatchRecord::new(MatchKey::new("m1", "t1"), "Alpha", "Beta", event_type).with_details(details)
    }

    #[test]
    fn goal_credits_scorer_and_debits_opponent() {
        let outcome = decode(&event_for(&record("goal", json!({})))).unwrap();
        let [alpha, beta] = &outcome.contributions;
        assert_eq!(alpha.team.as_str(), "Alpha");
        assert_eq!(alpha.contribution.goals_scored, 1);
        assert_eq!(beta.contribution.goals_conceded, 1);
        assert_eq!(beta.opponent.as_str(), "Alpha");
    }

    #[test]
    fn foul_touches_both_rows_but_counts_only_for_offender() {
        let outcome = decode(&event_for(&record("foul", json!({})))).unwrap();
        assert_eq!(outcome.contributions[0].contribution.fouls, 1);
        assert_eq!(outcome.contributions[1].contribution, Contribution::default());
    }

    #[test]
    fn result_with_winner_assigns_win_and_loss() {
        let outcome = decode(&event_for(&record("result", json!({"winner": "Beta"})))).unwrap();
        assert_eq!(
            outcome.contributions[0].contribution.outcome,
            Some(MatchResult::Loss)
        );
        assert_eq!(
            outcome.contributions[1].contribution.outcome,
            Some(MatchResult::Win)
        );
    }

    #[test]
    fn result_without_winner_is_a_draw() {
        let outcome = decode(&event_for(&record("result", json!({"outcome": "draw"})))).unwrap();
        assert!(outcome
            .contributions
            .iter()
            .all(|c| c.contribution.outcome == Some(MatchResult::Draw)));
    }

    #[test]
    fn unknown_winner_is_a_decode_error() {
        let err = decode(&event_for(&record("result", json!({"winner": "Gamma"})))).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownWinner { .. }));
    }

    #[test]
    fn unrecognized_event_type_contributes_nothing() {
        let outcome = decode(&event_for(&record("substitution", json!({})))).unwrap();
        assert!(outcome
            .contributions
            .iter()
            .all(|c| c.contribution == Contribution::default()));
    }

    #[test]
    fn missing_image_is_rejected() {
        let event = ChangeEvent::new(1, ChangeKind::Modify, MatchKey::new("m1", "t1"), None);
        assert_eq!(decode(&event).unwrap_err(), DecodeError::MissingImage);
    }

    #[test]
    fn image_without_team_is_rejected() {
        let event = ChangeEvent::new(
            1,
            ChangeKind::Insert,
            MatchKey::new("m1", "t1"),
            Some(json!({"match_id": "m1", "timestamp": "t1", "opponent": "Beta", "event_type": "goal"})),
        );
        assert_eq!(
            decode(&event).unwrap_err(),
            DecodeError::MissingField { field: "team" }
        );
    }

    #[test]
    fn image_for_other_key_is_rejected() {
        let rec = record("goal", json!({}));
        let event = ChangeEvent::new(
            1,
            ChangeKind::Insert,
            MatchKey::new("m1", "t2"),
            Some(rec.to_image().unwrap()),
        );
        assert!(matches!(
            decode(&event).unwrap_err(),
            DecodeError::KeyMismatch { .. }
        ));
    }

    #[test]
    fn non_object_details_are_rejected() {
        let mut image = record("goal", json!({})).to_image().unwrap();
        image["event_details"] = json!("not-an-object");
        let event = ChangeEvent::new(1, ChangeKind::Insert, MatchKey::new("m1", "t1"), Some(image));
        assert!(matches!(
            decode(&event).unwrap_err(),
            DecodeError::InvalidDetails(_)
        ));
    }
}
