//! Custom error types for the shop service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the shop service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Order body was not a JSON object
    #[error("Invalid order payload")]
    InvalidOrder,

    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Unknown email or wrong password; the two are deliberately reported
    /// the same way
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(&'static str),

    /// Internal failure with a client-safe message
    #[error("Internal server error: {0}")]
    Internal(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidOrder => {
                let body = Json(json!({
                    "status": "400",
                    "message": "Invalid JSON-message",
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
            ApiError::Database(DatabaseError::Conflict(msg)) => {
                error!("Unique constraint violated: {}", msg);
                (StatusCode::CONFLICT, "Duplicate document".to_string())
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
