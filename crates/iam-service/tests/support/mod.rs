//! In-memory test doubles for the service layer
//!
//! Repositories are backed by mutex-guarded maps. The refresh token
//! consume path removes the entry under the lock, which preserves the
//! exactly-one-winner behavior the real store provides.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use iam_common::auth::{JwtService, PasswordService};
use iam_core::entities::{Account, RefreshTokenRecord};
use iam_core::traits::{
    AccountPage, AccountQuery, AccountRepository, Clock, RefreshTokenRepository, RepoResult,
};
use iam_service::{ServiceContext, ServiceContextBuilder};

pub const T0: i64 = 1_700_000_000;
pub const ACCESS_TTL: i64 = 900;
pub const REFRESH_TTL: i64 = 604_800;

/// Clock that only moves when a test says so
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at_epoch() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.timestamp_opt(T0, 0).unwrap()),
        })
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// In-memory account repository
#[derive(Default)]
pub struct MemoryAccountRepository {
    // account plus its password hash
    accounts: Mutex<HashMap<Uuid, (Account, String)>>,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(&id).map(|(account, _)| account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|(account, _)| account.email == email)
            .map(|(account, _)| account.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list(&self, query: &AccountQuery) -> RepoResult<AccountPage> {
        let accounts = self.accounts.lock().unwrap();
        let mut matching: Vec<Account> = accounts
            .values()
            .map(|(account, _)| account.clone())
            .filter(|account| {
                if let Some(search) = &query.search {
                    let needle = search.to_lowercase();
                    if !account.email.to_lowercase().contains(&needle)
                        && !account.full_name.to_lowercase().contains(&needle)
                    {
                        return false;
                    }
                }
                if let Some(is_active) = query.is_active {
                    if account.is_active != is_active {
                        return false;
                    }
                }
                if let Some(role) = query.role {
                    if account.role != role {
                        return false;
                    }
                }
                true
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let offset = ((query.page - 1) * query.limit).max(0) as usize;
        let page: Vec<Account> = matching
            .into_iter()
            .skip(offset)
            .take(query.limit.max(0) as usize)
            .collect();

        Ok(AccountPage {
            accounts: page,
            total,
        })
    }

    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts.insert(account.id, (account.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&account.id) {
            Some(entry) => {
                entry.0 = account.clone();
                Ok(())
            }
            None => Err(iam_core::DomainError::AccountNotFound(account.id)),
        }
    }

    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(&id).map(|(_, hash)| hash.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&id) {
            Some(entry) => {
                entry.1 = password_hash.to_string();
                Ok(())
            }
            None => Err(iam_core::DomainError::AccountNotFound(id)),
        }
    }
}

/// In-memory refresh token repository keyed by token value
#[derive(Default)]
pub struct MemoryRefreshTokenRepository {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl MemoryRefreshTokenRepository {
    pub fn live_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn create(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        let mut records = self.records.lock().unwrap();
        records.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn consume(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        // Remove under the lock: one caller wins, the rest see None
        let mut records = self.records.lock().unwrap();
        Ok(records.remove(token))
    }

    async fn revoke_all(&self, account_id: Uuid) -> RepoResult<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| record.account_id != account_id);
        Ok((before - records.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        Ok((before - records.len()) as u64)
    }
}

/// Handles for a fully wired in-memory service context
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub clock: Arc<FixedClock>,
    pub accounts: Arc<MemoryAccountRepository>,
    pub tokens: Arc<MemoryRefreshTokenRepository>,
}

pub fn test_harness() -> TestHarness {
    let clock = FixedClock::at_epoch();
    let accounts = Arc::new(MemoryAccountRepository::default());
    let tokens = Arc::new(MemoryRefreshTokenRepository::default());

    let jwt_service = Arc::new(JwtService::new(
        "test-secret-key-that-is-long-enough",
        ACCESS_TTL,
        clock.clone(),
    ));

    let ctx = ServiceContextBuilder::new()
        .account_repo(accounts.clone())
        .refresh_token_repo(tokens.clone())
        .jwt_service(jwt_service)
        .password_service(PasswordService::new())
        .clock(clock.clone())
        .refresh_token_ttl(REFRESH_TTL)
        .build()
        .unwrap();

    TestHarness {
        ctx,
        clock,
        accounts,
        tokens,
    }
}
