//! Domain errors for match records and change feed images.
//!
//! [`ValidationError`] rejects a record before it is written to the Match
//! Store. [`DecodeError`] rejects a change event image that reached the
//! aggregation engine; such events are skipped rather than retried.

use thiserror::Error;

/// A submitted match record violates a required-field rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A team cannot play against itself.
    #[error("team and opponent must differ, both are '{team}'")]
    SameTeams {
        /// The duplicated team name.
        team: String,
    },

    /// `event_details` must be a JSON object.
    #[error("event_details must be a JSON object")]
    DetailsNotObject,
}

/// A change event image cannot be turned into statistics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Insert/Modify event without a new image.
    #[error("change event carries no new image")]
    MissingImage,

    /// The image is not a valid match record document.
    #[error("malformed match record image: {0}")]
    Malformed(String),

    /// The image decoded but a field required for aggregation is absent.
    #[error("image is missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The image's key disagrees with the event key.
    #[error("image key {image} does not match event key {event}")]
    KeyMismatch {
        /// Key found inside the image.
        image: String,
        /// Key carried by the event.
        event: String,
    },

    /// A result event names a winner that did not play.
    #[error("winner '{winner}' is neither '{team}' nor '{opponent}'")]
    UnknownWinner {
        /// The declared winner.
        winner: String,
        /// The acting team.
        team: String,
        /// The opponent.
        opponent: String,
    },

    /// `event_details` has an unusable shape.
    #[error("invalid event details: {0}")]
    InvalidDetails(String),
}
