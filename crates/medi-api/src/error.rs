//! # HTTP Error Mapping
//!
//! Turns `MarketError` into a JSON body with a consistent status code.
//! Configuration and internal messages are logged, never returned.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medi_core::MarketError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Convenient result alias for handlers and guards
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler-facing error
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub MarketError);

impl ApiError {
    pub fn into_inner(self) -> MarketError {
        self.0
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(MarketError::invalid_input(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(MarketError::invalid_input(rejection.body_text()))
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let code = err.status_code();

        let message = if err.is_internal() {
            error!("internal error: {}", err);
            "Internal server error".to_string()
        } else {
            if err.is_retryable() {
                warn!("upstream failure: {}", err);
            }
            err.to_string()
        };

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(message, code))).into_response()
    }
}
