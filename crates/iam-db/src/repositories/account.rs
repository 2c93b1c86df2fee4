//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use iam_core::entities::Account;
use iam_core::error::DomainError;
use iam_core::traits::{AccountPage, AccountQuery, AccountRepository, RepoResult};

use crate::mappers::role_to_str;
use crate::models::AccountModel;

use super::error::{account_not_found, map_db_error, map_unique_violation};

const ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, full_name, phone_number, avatar, role, is_active, created_at, updated_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &AccountQuery) -> RepoResult<AccountPage> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM accounts WHERE TRUE");
        let mut page_qb = QueryBuilder::new(format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE TRUE"
        ));

        for qb in [&mut count_qb, &mut page_qb] {
            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                qb.push(" AND (email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR full_name ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            if let Some(is_active) = query.is_active {
                qb.push(" AND is_active = ").push_bind(is_active);
            }
            if let Some(role) = query.role {
                qb.push(" AND role = ").push_bind(role_to_str(role));
            }
        }

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        page_qb
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let models: Vec<AccountModel> = page_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(AccountPage {
            accounts: models.into_iter().map(Account::from).collect(),
            total,
        })
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO accounts (id, email, password_hash, full_name, phone_number, avatar, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(password_hash)
        .bind(&account.full_name)
        .bind(&account.phone_number)
        .bind(&account.avatar)
        .bind(role_to_str(account.role))
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, account: &Account) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET email = $2, full_name = $3, phone_number = $4, avatar = $5,
                role = $6, is_active = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.phone_number)
        .bind(&account.avatar)
        .bind(role_to_str(account.role))
        .bind(account.is_active)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(account.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM accounts WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAccountRepository>();
    }
}
