//! Authentication service
//!
//! Handles account registration, login, token refresh, password changes,
//! and logout. This is where the token lifecycle rules live: refresh
//! tokens are single-use and every successful exchange rotates the full
//! pair.

use chrono::Duration;
use iam_common::auth::{generate_refresh_token, validate_password_strength, TokenPair};
use iam_common::AppError;
use iam_core::entities::RefreshTokenRecord;
use iam_core::Account;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, ChangePasswordRequest, CurrentAccountResponse, LoginRequest,
    RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and log it in
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        // Validate password strength before proceeding
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        // Check if email already exists
        if self.ctx.account_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        // Hash password
        let password_hash = self
            .ctx
            .password_service()
            .hash(&request.password)
            .map_err(ServiceError::from)?;

        // Create account
        let now = self.ctx.clock().now();
        let mut account = Account::new(Uuid::new_v4(), request.email, request.full_name, now);
        account.phone_number = request.phone_number;

        // Save to database
        self.ctx
            .account_repo()
            .create(&account, &password_hash)
            .await?;

        info!(account_id = %account.id, "Account registered successfully");

        // Registration doubles as the first login
        let token_pair = self.issue_token_pair(&account).await?;

        Ok(AuthResponse::new(
            token_pair.access_token,
            token_pair.refresh_token,
            token_pair.expires_in,
            CurrentAccountResponse::from(&account),
        ))
    }

    /// Login with email and password.
    ///
    /// Credential failures all map to `InvalidCredentials`; the inactive
    /// check runs only after the password has been verified, so a caller
    /// cannot probe whether an email exists or an account is disabled
    /// without knowing the password.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        // Find account by email
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: account not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Get password hash
        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Verify password
        let is_valid = self
            .ctx
            .password_service()
            .verify(&request.password, &password_hash)
            .map_err(ServiceError::from)?;

        if !is_valid {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        // Only now that credentials are proven does the active flag matter
        if !account.is_active {
            warn!(account_id = %account.id, "Login failed: account inactive");
            return Err(ServiceError::App(AppError::AccountInactive));
        }

        info!(account_id = %account.id, "Account logged in successfully");

        let token_pair = self.issue_token_pair(&account).await?;

        Ok(AuthResponse::new(
            token_pair.access_token,
            token_pair.refresh_token,
            token_pair.expires_in,
            CurrentAccountResponse::from(&account),
        ))
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented token is consumed atomically: it is gone after this
    /// call whether the exchange succeeds or not, so a replayed token can
    /// never mint a second pair.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let record = self
            .ctx
            .refresh_token_repo()
            .consume(&request.refresh_token)
            .await?
            .ok_or_else(|| {
                warn!("Refresh failed: token not found or already used");
                ServiceError::App(AppError::TokenNotFound)
            })?;

        // The row is already deleted; an expired record is reported as
        // expired rather than absent so logs can tell the cases apart.
        if record.is_expired_at(self.ctx.clock().now()) {
            warn!(account_id = %record.account_id, "Refresh failed: token expired");
            return Err(ServiceError::App(AppError::TokenExpired));
        }

        let account = self
            .ctx
            .account_repo()
            .find_by_id(record.account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", record.account_id.to_string()))?;

        let token_pair = self.issue_token_pair(&account).await?;

        info!(account_id = %account.id, "Tokens refreshed successfully");

        Ok(AuthResponse::new(
            token_pair.access_token,
            token_pair.refresh_token,
            token_pair.expires_in,
            CurrentAccountResponse::from(&account),
        ))
    }

    /// Logout by revoking every live refresh token for the account
    #[instrument(skip(self))]
    pub async fn logout(&self, account_id: Uuid) -> ServiceResult<()> {
        let revoked = self
            .ctx
            .refresh_token_repo()
            .revoke_all(account_id)
            .await?;

        info!(account_id = %account_id, revoked, "Account logged out");
        Ok(())
    }

    /// Change password after verifying the current one.
    ///
    /// A successful change revokes all refresh tokens, forcing every other
    /// session to re-authenticate. A failed attempt leaves sessions alone.
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        account_id: Uuid,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        validate_password_strength(&request.new_password).map_err(ServiceError::from)?;

        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        let is_valid = self
            .ctx
            .password_service()
            .verify(&request.old_password, &password_hash)
            .map_err(ServiceError::from)?;

        if !is_valid {
            warn!(account_id = %account_id, "Password change failed: wrong current password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        let new_hash = self
            .ctx
            .password_service()
            .hash(&request.new_password)
            .map_err(ServiceError::from)?;

        self.ctx
            .account_repo()
            .update_password(account_id, &new_hash)
            .await?;

        let revoked = self
            .ctx
            .refresh_token_repo()
            .revoke_all(account_id)
            .await?;

        info!(account_id = %account_id, revoked, "Password changed, sessions revoked");
        Ok(())
    }

    /// Validate an access token and return the account ID
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> ServiceResult<Uuid> {
        let claims = self
            .ctx
            .jwt_service()
            .verify(token)
            .map_err(ServiceError::from)?;

        claims.account_id().map_err(ServiceError::from)
    }

    /// Get the account behind an access token, rejecting inactive accounts
    #[instrument(skip(self, token))]
    pub async fn get_account_from_token(&self, token: &str) -> ServiceResult<Account> {
        let account_id = self.validate_token(token)?;

        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        if !account.is_active {
            return Err(ServiceError::App(AppError::AccountInactive));
        }

        Ok(account)
    }

    /// Delete refresh token records whose expiry has passed, returning the
    /// count. Intended to be called periodically; consumption already
    /// rejects expired records, so this is housekeeping rather than a
    /// correctness requirement.
    #[instrument(skip(self))]
    pub async fn sweep_expired_tokens(&self) -> ServiceResult<u64> {
        let swept = self
            .ctx
            .refresh_token_repo()
            .delete_expired(self.ctx.clock().now())
            .await?;

        if swept > 0 {
            info!(swept, "Swept expired refresh tokens");
        }
        Ok(swept)
    }

    /// Issue a fresh token pair and persist the refresh side
    async fn issue_token_pair(&self, account: &Account) -> ServiceResult<TokenPair> {
        let access_token = self
            .ctx
            .jwt_service()
            .issue(account)
            .map_err(ServiceError::from)?;

        let refresh_token = generate_refresh_token();
        let now = self.ctx.clock().now();
        let record = RefreshTokenRecord::new(
            account.id,
            refresh_token.clone(),
            now + Duration::seconds(self.ctx.refresh_token_ttl()),
            now,
        );
        self.ctx.refresh_token_repo().create(&record).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.ctx.jwt_service().access_token_ttl(),
        ))
    }
}
