use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application-level error kinds, mapped one-to-one onto HTTP statuses.
///
/// Full detail is logged server-side; clients only ever see the generic
/// `{"error": message}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing upload data (empty file, malformed multipart).
    #[error("{0}")]
    InvalidInput(String),
    /// No video exists for the requested id.
    #[error("{0}")]
    NotFound(String),
    /// The blob store could not be reached or a call to it failed.
    #[error("{0}")]
    StorageUnavailable(String),
    /// A metadata sidecar exists but its JSON could not be decoded.
    #[error("{0}")]
    Corrupt(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("storage unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Object store unavailable".to_string())
            }
            AppError::Corrupt(msg) => {
                tracing::error!("corrupt metadata: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
