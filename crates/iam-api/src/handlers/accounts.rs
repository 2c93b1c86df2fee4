//! Account handlers
//!
//! Profile endpoints for the current account plus administrative listing,
//! lookup, and deactivation.

use axum::{extract::State, Json};
use iam_service::dto::{
    AccountResponse, CurrentAccountResponse, ListAccountsQuery, PaginatedResponse,
    UpdateAccountRequest,
};
use iam_service::AccountService;

use crate::extractors::{AccountIdPath, AdminUser, ApiQuery, AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get the current account's profile
///
/// GET /users/@me
pub async fn get_current_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_current_account(auth.account_id).await?;
    Ok(Json(response))
}

/// Update the current account's profile
///
/// PATCH /users/@me
pub async fn update_current_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.update_account(auth.account_id, request).await?;
    Ok(Json(response))
}

/// List accounts with pagination and filters (admin only)
///
/// GET /users
pub async fn list_accounts(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<ListAccountsQuery>,
) -> ApiResult<Json<PaginatedResponse<AccountResponse>>> {
    let service = AccountService::new(state.service_context());
    let response = service.list_accounts(query).await?;
    Ok(Json(response))
}

/// Get an account by ID (admin only)
///
/// GET /users/:account_id
pub async fn get_account(
    State(state): State<AppState>,
    _admin: AdminUser,
    AccountIdPath(account_id): AccountIdPath,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_account(account_id).await?;
    Ok(Json(response))
}

/// Deactivate an account (admin only)
///
/// DELETE /users/:account_id
pub async fn deactivate_account(
    State(state): State<AppState>,
    _admin: AdminUser,
    AccountIdPath(account_id): AccountIdPath,
) -> ApiResult<NoContent> {
    let service = AccountService::new(state.service_context());
    service.deactivate_account(account_id).await?;
    Ok(NoContent)
}
