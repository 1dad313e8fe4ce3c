use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::orchestrator::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InterviewError> for AppError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::Generation(e) => AppError::Generation(e.to_string()),
            InterviewError::Evaluation(e) => AppError::Evaluation(e.to_string()),
            InterviewError::InvalidState(msg) => AppError::InvalidState(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "Question generation failed; please try again".to_string(),
                )
            }
            AppError::Evaluation(msg) => {
                tracing::error!("Evaluation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EVALUATION_ERROR",
                    "The answer could not be evaluated; please resubmit it".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
