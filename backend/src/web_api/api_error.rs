use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt::Display;
use thiserror::Error;

use crate::message_response::MessageResponse;

/// Request-level failures. Each variant maps to one status code and a
/// `{message, error}` JSON envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task not found")]
    NotFound,
    #[error("{message}: {error}")]
    BadRequest { message: &'static str, error: String },
    #[error("{message}: {error}")]
    Internal { message: &'static str, error: String },
}

impl ApiError {
    pub fn bad_request(message: &'static str, error: impl Display) -> Self {
        ApiError::BadRequest {
            message,
            error: error.to_string(),
        }
    }

    pub fn internal(message: &'static str, error: impl Display) -> Self {
        ApiError::Internal {
            message,
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound => MessageResponse::new("Task not found"),
            ApiError::BadRequest { message, error } => {
                tracing::warn!(%error, "{message}");
                MessageResponse::with_error(message, error)
            }
            ApiError::Internal { message, error } => {
                tracing::error!(%error, "{message}");
                MessageResponse::with_error(message, error)
            }
        };
        (status, Json(body)).into_response()
    }
}
