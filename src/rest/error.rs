// rest/error.rs — unified request error type.
//
// Every handler failure flows through ApiError so the wire format lives in
// exactly one place. The id-validation variants carry the entity kind
// ("Task" / "Goal") so the bodies read the same for both resources.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The path (or payload) identifier is not an integer.
    #[error("{kind} {raw} invalid")]
    InvalidId { kind: &'static str, raw: String },

    /// No entity with this identifier exists.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// A required payload field is missing.
    #[error("Invalid data")]
    InvalidData,

    /// Storage or other infrastructure failure. Logged with its cause chain;
    /// the client only ever sees an opaque 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidId { kind, raw } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("{kind} {raw} invalid") })),
            )
                .into_response(),
            ApiError::NotFound { kind, id } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{kind} {id} not found") })),
            )
                .into_response(),
            ApiError::InvalidData => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "details": "Invalid data" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                error!(err = %format!("{err:#}"), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
