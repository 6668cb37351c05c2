use crate::session::SessionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Request-level errors, converted to a JSON body with a matching status
/// code. Backend and internal failures are logged in full server-side; the
/// client only sees a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Session(SessionError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Session(SessionError::AwaitingReply)
            | ApiError::Session(SessionError::NothingToAnswer) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Session(SessionError::Backend(e)) => {
                error!("Reply generation failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "response generation failed".to_string(),
                )
            }
            ApiError::Internal(m) => {
                error!("Internal error: {}", m);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
