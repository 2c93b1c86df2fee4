//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Account, RefreshTokenRecord};
use crate::error::DomainError;
use crate::value_objects::Role;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Query parameters for listing accounts
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
    /// 1-based page number
    pub page: i64,
    /// Page size
    pub limit: i64,
    /// Case-insensitive match against email or full name
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

/// One page of accounts plus the total match count
#[derive(Debug, Clone)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub total: i64,
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// List accounts matching a query, newest first
    async fn list(&self, query: &AccountQuery) -> RepoResult<AccountPage>;

    /// Create a new account. The password hash is produced by the caller
    /// before the entity reaches this layer; there is no hash-on-save hook.
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()>;

    /// Update mutable account fields (profile, role, active flag)
    async fn update(&self, account: &Account) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Refresh Token Repository
// ============================================================================

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a freshly issued record
    async fn create(&self, record: &RefreshTokenRecord) -> RepoResult<()>;

    /// Atomically look up a record by token value and delete it.
    ///
    /// Lookup and delete must be indivisible with respect to concurrent
    /// callers presenting the same token value: exactly one caller
    /// observes the record, the rest get `None`. The returned record may
    /// already be past its expiry; interpreting that is the caller's job
    /// (the row is gone either way).
    async fn consume(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>>;

    /// Delete every live record owned by the account, returning the count.
    /// Idempotent: revoking an account with no live tokens returns 0.
    async fn revoke_all(&self, account_id: Uuid) -> RepoResult<u64>;

    /// Sweep records whose expiry has passed, returning the count
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
