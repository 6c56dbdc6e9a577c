//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shop_core::{ErrorBody, InvalidId, ValidationError};

use crate::db::StoreError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    PayloadTooLarge,
    TooManyRequests,
    ServiceUnavailable(String),
    Internal(String),
}

impl AppError {
    /// Generic 404 for unmatched routes
    pub fn route_not_found() -> Self {
        AppError::NotFound("API endpoint not found".to_string())
    }

    pub fn not_ready() -> Self {
        AppError::ServiceUnavailable("Database not ready".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            AppError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Please try again later.".to_string(),
            ),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                // Details stay in the logs
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<InvalidId> for AppError {
    fn from(err: InvalidId) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(msg) => {
                tracing::warn!(error = %msg, "Store rejected write");
                AppError::BadRequest("Invalid ID or data".to_string())
            }
            StoreError::Backend(msg) => AppError::Internal(format!("Database error: {}", msg)),
        }
    }
}
