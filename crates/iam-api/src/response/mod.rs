//! Response types and error handling for API endpoints
//!
//! Provides unified error handling and JSON response formatting. Every
//! error that reaches a client passes through `AppError`'s public view,
//! so credential and token failures leave the server as one generic 401
//! and internal detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iam_common::{AppError, ErrorResponse};
use iam_core::DomainError;
use iam_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Domain(e) => {
                if e.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if e.is_validation() {
                    StatusCode::BAD_REQUEST
                } else if e.is_conflict() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            Self::Validation(_) | Self::InvalidPath(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingAuth => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Collapse into the application error whose public view is safe to
    /// serialize
    fn into_app_error(self) -> AppError {
        match self {
            Self::App(e) => e,
            Self::Service(e) => e.into(),
            Self::Domain(e) => AppError::Domain(e),
            Self::Validation(e) => AppError::Validation(e.to_string()),
            Self::InvalidPath(msg) => AppError::Validation(format!("Invalid path parameter: {msg}")),
            Self::InvalidQuery(msg) => {
                AppError::Validation(format!("Invalid query parameter: {msg}"))
            }
            Self::MissingAuth => AppError::MissingAuth,
            Self::Internal(e) => AppError::Internal(e),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail for API responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log with the fine-grained internal code; the client sees only
        // the public view below
        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        // Field-level details are disclosed for validation errors only
        let details = if let Self::Validation(errors) = &self {
            Some(serde_json::to_value(errors).unwrap_or_default())
        } else {
            None
        };

        let public: ErrorResponse = self.into_app_error().into();
        let body = ErrorBody {
            error: ErrorDetail {
                code: public.code,
                message: public.message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// No content response (204)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::MissingAuth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::InvalidPath("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::App(AppError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_unauthorized_kinds_share_one_public_code() {
        for err in [
            ApiError::MissingAuth,
            ApiError::App(AppError::InvalidCredentials),
            ApiError::App(AppError::TokenExpired),
            ApiError::App(AppError::TokenNotFound),
            ApiError::App(AppError::TokenSignatureMismatch),
        ] {
            let public: ErrorResponse = err.into_app_error().into();
            assert_eq!(public.code, "UNAUTHORIZED");
            assert_eq!(public.message, "Unauthorized");
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Service(ServiceError::internal("pool timed out at 10.0.0.3"));
        let public: ErrorResponse = err.into_app_error().into();
        assert_eq!(public.code, "INTERNAL_ERROR");
        assert_eq!(public.message, "Internal server error");
    }
}
