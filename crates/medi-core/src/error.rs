//! # Marketplace Error Types
//!
//! Typed error handling for the MediSnap API.
//! Every guard, store and provider operation returns `Result<T, MarketError>`.

use thiserror::Error;

/// Core error type for all marketplace operations
#[derive(Debug, Error)]
pub enum MarketError {
    /// Missing, malformed or expired credential
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but their role is not admitted
    #[error("{0}")]
    Forbidden(String),

    /// Route or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Route exists but not for this HTTP method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Bad identifier, bad amount, malformed body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database or payment processor failure
    #[error("Upstream failure [{service}]: {message}")]
    UpstreamFailure { service: String, message: String },

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Guard rejection for an absent or invalid token
    pub fn unauthorized() -> Self {
        MarketError::Unauthorized("unauthorized access".to_string())
    }

    /// Guard rejection for a role mismatch
    pub fn forbidden() -> Self {
        MarketError::Forbidden("forbidden access".to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        MarketError::InvalidInput(message.into())
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        MarketError::UpstreamFailure {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Returns true if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, MarketError::UpstreamFailure { .. })
    }

    /// Returns true if the message must not be shown to clients
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MarketError::Configuration(_) | MarketError::Internal(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::Unauthorized(_) => 401,
            MarketError::Forbidden(_) => 403,
            MarketError::NotFound(_) => 404,
            MarketError::MethodNotAllowed(_) => 405,
            MarketError::InvalidInput(_) => 400,
            MarketError::UpstreamFailure { .. } => 502,
            MarketError::Configuration(_) => 500,
            MarketError::Internal(_) => 500,
        }
    }
}

/// Result type alias for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;
