//! Match records as stored in the Match Store.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ValidationError;
use super::id::{MatchId, TeamName, Timestamp};

/// Primary key of a match record: `(match_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub match_id: MatchId,
    pub timestamp: Timestamp,
}

impl MatchKey {
    pub fn new(match_id: impl Into<MatchId>, timestamp: impl Into<Timestamp>) -> Self {
        Self {
            match_id: match_id.into(),
            timestamp: timestamp.into(),
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.match_id, self.timestamp)
    }
}

/// One revision of a match: a single event attributed to `team` against
/// `opponent` at `timestamp`.
///
/// Several timestamps may exist per match; rewriting an existing
/// `(match_id, timestamp)` is a correction of that revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub timestamp: Timestamp,
    pub team: TeamName,
    pub opponent: TeamName,
    pub event_type: String,
    #[serde(default = "empty_details")]
    pub event_details: Value,
}

fn empty_details() -> Value {
    Value::Object(Map::new())
}

impl MatchRecord {
    /// Build a record with empty details.
    pub fn new(
        key: MatchKey,
        team: impl Into<TeamName>,
        opponent: impl Into<TeamName>,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            match_id: key.match_id,
            timestamp: key.timestamp,
            team: team.into(),
            opponent: opponent.into(),
            event_type: event_type.into(),
            event_details: empty_details(),
        }
    }

    /// Replace the event details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.event_details = details;
        self
    }

    /// The record's store key.
    #[must_use]
    pub fn key(&self) -> MatchKey {
        MatchKey {
            match_id: self.match_id.clone(),
            timestamp: self.timestamp.clone(),
        }
    }

    /// Check the invariants the Match Store relies on.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("match_id", self.match_id.as_str())?;
        require("timestamp", self.timestamp.as_str())?;
        require("team", self.team.as_str())?;
        require("opponent", self.opponent.as_str())?;
        require("event_type", &self.event_type)?;
        if self.team == self.opponent {
            return Err(ValidationError::SameTeams {
                team: self.team.to_string(),
            });
        }
        if !self.event_details.is_object() {
            return Err(ValidationError::DetailsNotObject);
        }
        Ok(())
    }

    /// Document form used as the change feed's new image.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_image(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

/// Raw ingestion payload. Every field is optional so that absence is
/// reported as a [`ValidationError`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchSubmission {
    pub match_id: Option<String>,
    pub timestamp: Option<String>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub event_type: Option<String>,
    pub event_details: Option<Value>,
}

impl TryFrom<MatchSubmission> for MatchRecord {
    type Error = ValidationError;

    fn try_from(submission: MatchSubmission) -> Result<Self, Self::Error> {
        let field = |value: Option<String>, field: &'static str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(ValidationError::MissingField { field })
        };

        let record = MatchRecord {
            match_id: MatchId::new(field(submission.match_id, "match_id")?),
            timestamp: Timestamp::new(field(submission.timestamp, "timestamp")?),
            team: TeamName::new(field(submission.team, "team")?),
            opponent: TeamName::new(field(submission.opponent, "opponent")?),
            event_type: field(submission.event_type, "event_type")?,
            event_details: match submission.event_details {
                None | Some(Value::Null) => empty_details(),
                Some(details) => details,
            },
        };
        record.validate()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> MatchSubmission {
        MatchSubmission {
            match_id: Some("m1".into()),
            timestamp: Some("2024-05-01T18:00:00Z".into()),
            team: Some("Alpha".into()),
            opponent: Some("Beta".into()),
            event_type: Some("goal".into()),
            event_details: Some(json!({"minute": 12})),
        }
    }

    #[test]
    fn complete_submission_becomes_record() {
        let record = MatchRecord::try_from(submission()).unwrap();
        assert_eq!(record.key(), MatchKey::new("m1", "2024-05-01T18:00:00Z"));
        assert_eq!(record.event_details["minute"], 12);
    }

    #[test]
    fn missing_match_id_is_rejected() {
        let mut s = submission();
        s.match_id = None;
        assert_eq!(
            MatchRecord::try_from(s).unwrap_err(),
            ValidationError::MissingField { field: "match_id" }
        );
    }

    #[test]
    fn blank_timestamp_is_rejected() {
        let mut s = submission();
        s.timestamp = Some("   ".into());
        assert_eq!(
            MatchRecord::try_from(s).unwrap_err(),
            ValidationError::MissingField { field: "timestamp" }
        );
    }

    #[test]
    fn absent_details_default_to_empty_object() {
        let mut s = submission();
        s.event_details = None;
        let record = MatchRecord::try_from(s).unwrap();
        assert_eq!(record.event_details, json!({}));
    }

    #[test]
    fn team_cannot_play_itself() {
        let mut s = submission();
        s.opponent = Some("Alpha".into());
        assert!(matches!(
            MatchRecord::try_from(s),
            Err(ValidationError::SameTeams { .. })
        ));
    }

    #[test]
    fn non_object_details_are_rejected() {
        let mut s = submission();
        s.event_details = Some(json!([1, 2, 3]));
        assert_eq!(
            MatchRecord::try_from(s).unwrap_err(),
            ValidationError::DetailsNotObject
        );
    }

    #[test]
    fn image_round_trips_through_json() {
        let record = MatchRecord::try_from(submission()).unwrap();
        let image = record.to_image().unwrap();
        assert_eq!(image["team"], "Alpha");
        let back: MatchRecord = serde_json::from_value(image).unwrap();
        assert_eq!(back, record);
    }
}
