//! Typed path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::response::ApiError;

/// Account ID path parameter, parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct AccountIdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AccountIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let id = raw
            .parse::<Uuid>()
            .map_err(|_| ApiError::invalid_path("Account ID must be a UUID"))?;

        Ok(AccountIdPath(id))
    }
}
