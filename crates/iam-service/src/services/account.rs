//! Account service
//!
//! Handles account profile operations and administrative listing.

use iam_core::traits::AccountQuery;
use iam_core::Account;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{
    AccountResponse, CurrentAccountResponse, ListAccountsQuery, PaginatedResponse,
    UpdateAccountRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get account by ID
    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: Uuid) -> ServiceResult<AccountResponse> {
        let account = self.get_account_entity(account_id).await?;
        Ok(AccountResponse::from(&account))
    }

    /// Get current authenticated account (full profile)
    #[instrument(skip(self))]
    pub async fn get_current_account(
        &self,
        account_id: Uuid,
    ) -> ServiceResult<CurrentAccountResponse> {
        let account = self.get_account_entity(account_id).await?;
        Ok(CurrentAccountResponse::from(&account))
    }

    /// Get account entity by ID
    #[instrument(skip(self))]
    pub async fn get_account_entity(&self, account_id: Uuid) -> ServiceResult<Account> {
        self.ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))
    }

    /// List accounts with pagination and optional filters, newest first
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        query: ListAccountsQuery,
    ) -> ServiceResult<PaginatedResponse<AccountResponse>> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, 100);

        let repo_query = AccountQuery {
            page,
            limit,
            search: query.search,
            is_active: query.is_active,
            role: query.role,
        };

        let result = self.ctx.account_repo().list(&repo_query).await?;

        let accounts = result
            .accounts
            .iter()
            .map(AccountResponse::from)
            .collect();

        Ok(PaginatedResponse::new(accounts, result.total, page, limit))
    }

    /// Update the current account's profile
    #[instrument(skip(self, request))]
    pub async fn update_account(
        &self,
        account_id: Uuid,
        request: UpdateAccountRequest,
    ) -> ServiceResult<CurrentAccountResponse> {
        let mut account = self.get_account_entity(account_id).await?;

        if request.is_empty() {
            return Ok(CurrentAccountResponse::from(&account));
        }

        let now = self.ctx.clock().now();

        if let Some(email) = request.email {
            if email != account.email {
                if self.ctx.account_repo().email_exists(&email).await? {
                    return Err(ServiceError::conflict("Email already registered"));
                }
                account.set_email(email, now);
            }
        }
        if let Some(full_name) = request.full_name {
            account.set_full_name(full_name, now);
        }
        if let Some(phone_number) = request.phone_number {
            account.set_phone_number(Some(phone_number), now);
        }
        if let Some(avatar) = request.avatar {
            account.set_avatar(Some(avatar), now);
        }

        self.ctx.account_repo().update(&account).await?;
        info!(account_id = %account_id, "Account profile updated");

        Ok(CurrentAccountResponse::from(&account))
    }

    /// Deactivate an account.
    ///
    /// Deactivation revokes every refresh token, so the account cannot
    /// mint new access tokens once the current ones expire.
    #[instrument(skip(self))]
    pub async fn deactivate_account(&self, account_id: Uuid) -> ServiceResult<()> {
        let mut account = self.get_account_entity(account_id).await?;

        if account.is_active {
            account.deactivate(self.ctx.clock().now());
            self.ctx.account_repo().update(&account).await?;
        }

        let revoked = self
            .ctx
            .refresh_token_repo()
            .revoke_all(account_id)
            .await?;

        info!(account_id = %account_id, revoked, "Account deactivated");
        Ok(())
    }
}
