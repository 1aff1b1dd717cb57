//! Mapping from crate errors onto HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::error::{Error, StoreError};

/// Error half of every handler's result.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or missing required fields.
    BadRequest(String),
    NotFound(String),
    /// The store could not complete the request in time; retrying may help.
    Unavailable(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            Error::Timeout { .. } | Error::Store(StoreError::Transient(_)) => {
                ApiError::Unavailable(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "Invalid match record.", detail)
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "Not found.", detail),
            ApiError::Unavailable(detail) => {
                tracing::warn!(error = %detail, "Request abandoned");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Store temporarily unavailable.",
                    detail,
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.",
                    "internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
            "error": detail,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ValidationError;

    #[test]
    fn validation_maps_to_bad_request() {
        let api: ApiError = Error::from(ValidationError::MissingField { field: "team" }).into();
        assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn abandoned_write_maps_to_unavailable() {
        let api: ApiError = Error::Timeout {
            operation: "match write",
            after_ms: 300_000,
        }
        .into();
        assert_eq!(api.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn permanent_store_error_is_internal() {
        let api: ApiError = Error::from(StoreError::Permanent("no such table".into())).into();
        assert_eq!(api.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
