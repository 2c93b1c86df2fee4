//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use iam_core::Account;

use super::responses::{AccountResponse, CurrentAccountResponse};

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            avatar: account.avatar.clone(),
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

impl From<&Account> for CurrentAccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            phone_number: account.phone_number.clone(),
            avatar: account.avatar.clone(),
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<Account> for CurrentAccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use iam_core::Role;
    use uuid::Uuid;

    #[test]
    fn test_account_response_from_entity() {
        let account = Account::new(
            Uuid::new_v4(),
            "alice@example.com".to_string(),
            "Alice Example".to_string(),
            Utc::now(),
        );

        let response = AccountResponse::from(&account);
        assert_eq!(response.id, account.id.to_string());
        assert_eq!(response.email, "alice@example.com");
        assert_eq!(response.role, Role::User);
        assert!(response.is_active);
    }
}
