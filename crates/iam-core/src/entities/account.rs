//! Account entity - a user of the system

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::Role;

/// Account entity. The password hash is deliberately not a field here:
/// it never leaves the persistence layer except through
/// `AccountRepository::get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active account with the default role
    pub fn new(id: Uuid, email: String, full_name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            full_name,
            phone_number: None,
            avatar: None,
            role: Role::User,
            is_active: true,
            created_at,
            updated_at: created_at,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Change the login email. Uniqueness is the caller's responsibility.
    pub fn set_email(&mut self, email: String, now: DateTime<Utc>) {
        self.email = email;
        self.updated_at = now;
    }

    /// Update the profile fields that accounts may change themselves
    pub fn set_full_name(&mut self, full_name: String, now: DateTime<Utc>) {
        self.full_name = full_name;
        self.updated_at = now;
    }

    pub fn set_phone_number(&mut self, phone_number: Option<String>, now: DateTime<Utc>) {
        self.phone_number = phone_number;
        self.updated_at = now;
    }

    pub fn set_avatar(&mut self, avatar: Option<String>, now: DateTime<Utc>) {
        self.avatar = avatar;
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            Uuid::new_v4(),
            "alice@example.com".to_string(),
            "Alice Example".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_account_is_active_user() {
        let account = account();
        assert!(account.is_active);
        assert_eq!(account.role, Role::User);
        assert!(!account.is_admin());
    }

    #[test]
    fn test_deactivate() {
        let mut account = account();
        let later = account.created_at + chrono::Duration::hours(1);
        account.deactivate(later);
        assert!(!account.is_active);
        assert_eq!(account.updated_at, later);
    }

    #[test]
    fn test_profile_updates_touch_updated_at() {
        let mut account = account();
        let later = account.created_at + chrono::Duration::minutes(5);
        account.set_full_name("Alice B. Example".to_string(), later);
        assert_eq!(account.full_name, "Alice B. Example");
        assert_eq!(account.updated_at, later);
    }
}
