//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use outreach_types::error::{ComposeError, DispatchError, GenerationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Draft-generation errors.
    Generation(GenerationError),
    /// Batch-dispatch setup errors.
    Dispatch(DispatchError),
    /// Compose workflow misuse.
    Compose(ComposeError),
    /// Unknown compose session id.
    SessionNotFound,
    /// Validation error.
    Validation(String),
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError::Dispatch(e)
    }
}

impl From<ComposeError> for AppError {
    fn from(e: ComposeError) -> Self {
        AppError::Compose(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Generation(GenerationError::Unavailable(msg)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATION_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Generation(GenerationError::Failed(msg)) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", msg.clone())
            }
            AppError::Generation(GenerationError::Cancelled) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATION_CANCELLED",
                "draft generation cancelled".to_string(),
            ),
            AppError::Dispatch(DispatchError::AudienceNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "AUDIENCE_NOT_FOUND",
                format!("Audience '{id}' not found"),
            ),
            AppError::Dispatch(DispatchError::Unauthorized(msg)) => (
                StatusCode::UNAUTHORIZED,
                "TRANSPORT_UNAUTHORIZED",
                msg.clone(),
            ),
            AppError::Dispatch(DispatchError::Directory(msg)) => (
                StatusCode::BAD_GATEWAY,
                "DIRECTORY_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Compose(e @ ComposeError::InvalidTransition { .. }) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
            }
            AppError::Compose(ComposeError::AtFirstStep) => (
                StatusCode::CONFLICT,
                "AT_FIRST_STEP",
                "cannot go back from the first step".to_string(),
            ),
            AppError::Compose(ComposeError::NoAudienceSelected) => (
                StatusCode::CONFLICT,
                "NO_AUDIENCE_SELECTED",
                "no audience selected".to_string(),
            ),
            AppError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Compose session not found".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
