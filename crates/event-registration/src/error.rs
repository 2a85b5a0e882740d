//! Error types for the registration backend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registration_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Generic message returned for server-side failures.
const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Backend error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Export file error: {0}")]
    FileIo(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Error while decoding token, Error: {0}")]
    InvalidToken(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Error body for server-side failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error body for the admin authentication endpoints.
#[derive(Debug, Serialize)]
pub struct AuthFailureResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Storage(_) | ApiError::FileIo(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: INTERNAL_ERROR_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            ApiError::InvalidCredentials | ApiError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                Json(AuthFailureResponse {
                    success: false,
                    message: self.to_string(),
                }),
            )
                .into_response(),
            ApiError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: "Too Many Requests".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::FileIo(e.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(e: csv::Error) -> Self {
        ApiError::FileIo(format!("CSV write error: {}", e))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        ApiError::InvalidToken(e.to_string())
    }
}
