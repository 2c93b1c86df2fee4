//! PostgreSQL implementation of RefreshTokenRepository
//!
//! The consume path is the safety-critical piece of this crate: lookup and
//! delete happen in one `DELETE ... RETURNING` statement, so two callers
//! racing on the same token value can never both observe the row. A
//! separate read-then-delete would open a replay window in which a stolen
//! refresh token could be exchanged twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use iam_core::entities::RefreshTokenRecord;
use iam_core::traits::{RefreshTokenRepository, RepoResult};

use crate::models::RefreshTokenModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RefreshTokenRepository
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new PgRefreshTokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    #[instrument(skip(self, record), fields(account_id = %record.account_id))]
    async fn create(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, account_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(record.id)
        .bind(record.account_id)
        .bind(&record.token)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn consume(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        // Single statement: exactly one concurrent caller gets the row back,
        // everyone else sees no row. Expired rows are returned too (and are
        // gone after this call); the service layer decides what expiry means.
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            DELETE FROM refresh_tokens
            WHERE token = $1
            RETURNING id, account_id, token, expires_at, created_at
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshTokenRecord::from))
    }

    #[instrument(skip(self))]
    async fn revoke_all(&self, account_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM refresh_tokens WHERE account_id = $1
            ",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM refresh_tokens WHERE expires_at <= $1
            ",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRefreshTokenRepository>();
    }
}
