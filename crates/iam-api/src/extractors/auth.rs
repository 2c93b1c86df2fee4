//! Authentication extractors
//!
//! Extract and verify access tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use iam_common::AppError;
use iam_core::Role;
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated account extracted from a verified access token.
///
/// Verification is purely stateless: signature plus expiry on the claims,
/// no store lookup. Handlers that need the live account row fetch it
/// themselves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Account ID from the token subject
    pub account_id: Uuid,
    /// Role claim embedded at issue time
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Verify signature and expiry. The fine-grained error is kept for
        // logging; the response collapses to a generic 401.
        let claims = app_state.jwt_service().verify(bearer.token()).map_err(|e| {
            tracing::warn!(error_code = e.error_code(), "Access token rejected");
            ApiError::App(e)
        })?;

        let account_id = claims.account_id().map_err(|e| {
            tracing::warn!("Access token subject is not an account ID");
            ApiError::App(e)
        })?;

        Ok(AuthUser {
            account_id,
            role: claims.role,
        })
    }
}

/// Authenticated account that must hold the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::App(AppError::InsufficientPermissions));
        }

        Ok(AdminUser(user))
    }
}
