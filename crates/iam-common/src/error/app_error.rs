//! Application error types
//!
//! Unified error handling for the entire application.
//!
//! The credential/token variants are deliberately fine-grained: logging and
//! metrics need to distinguish a bad signature from an expired token from a
//! consumed refresh token. Clients never see the distinction: everything
//! `is_unauthorized()` collapses to one generic 401 at the transport
//! boundary so the API is not an oracle for account enumeration.

use iam_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Credential errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    // Access token errors
    #[error("Token is malformed")]
    TokenMalformed,

    #[error("Token signature mismatch")]
    TokenSignatureMismatch,

    #[error("Token expired")]
    TokenExpired,

    // Refresh token errors
    #[error("Refresh token not found")]
    TokenNotFound,

    #[error("Missing authentication")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,

            Self::InvalidCredentials
            | Self::AccountInactive
            | Self::TokenMalformed
            | Self::TokenSignatureMismatch
            | Self::TokenExpired
            | Self::TokenNotFound
            | Self::MissingAuth => 401,

            Self::InsufficientPermissions => 403,

            Self::NotFound(_) => 404,

            Self::Conflict(_) => 409,

            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,

            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Internal error code, for logs and metrics only
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenSignatureMismatch => "TOKEN_SIGNATURE_MISMATCH",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::MissingAuth => "MISSING_AUTH",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if this error must be collapsed to a generic 401 at the
    /// transport boundary
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::AccountInactive
                | Self::TokenMalformed
                | Self::TokenSignatureMismatch
                | Self::TokenExpired
                | Self::TokenNotFound
                | Self::MissingAuth
        )
    }

    /// Error code safe to disclose to clients. Unauthorized kinds collapse
    /// to one generic code; server errors hide their detail.
    #[must_use]
    pub fn public_code(&self) -> &'static str {
        if self.is_unauthorized() {
            "UNAUTHORIZED"
        } else if self.is_server_error() {
            "INTERNAL_ERROR"
        } else {
            self.error_code()
        }
    }

    /// Message safe to disclose to clients
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_unauthorized() {
            "Unauthorized".to_string()
        } else if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.public_code().to_string(),
            message: err.public_message(),
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::AccountInactive.status_code(), 401);
        assert_eq!(AppError::TokenNotFound.status_code(), 401);
        assert_eq!(AppError::InsufficientPermissions.status_code(), 403);
        assert_eq!(AppError::NotFound("account".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::Database("test".to_string()).status_code(), 500);
    }

    #[test]
    fn test_unauthorized_kinds_collapse() {
        for err in [
            AppError::InvalidCredentials,
            AppError::AccountInactive,
            AppError::TokenMalformed,
            AppError::TokenSignatureMismatch,
            AppError::TokenExpired,
            AppError::TokenNotFound,
            AppError::MissingAuth,
        ] {
            assert!(err.is_unauthorized());
            assert_eq!(err.public_code(), "UNAUTHORIZED");
            assert_eq!(err.public_message(), "Unauthorized");
        }
    }

    #[test]
    fn test_internal_kinds_stay_distinct() {
        assert_eq!(AppError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(
            AppError::TokenSignatureMismatch.error_code(),
            "TOKEN_SIGNATURE_MISMATCH"
        );
        assert_eq!(AppError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_store_error_is_never_exposed_verbatim() {
        let err = AppError::Database("connection refused to 10.0.0.3:5432".to_string());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert_eq!(response.message, "Internal server error");
    }

    #[test]
    fn test_domain_error_mapping() {
        let err = AppError::Domain(DomainError::AccountNotFound(Uuid::nil()));
        assert_eq!(err.status_code(), 404);
        let err = AppError::Domain(DomainError::EmailAlreadyExists);
        assert_eq!(err.status_code(), 409);
    }
}
