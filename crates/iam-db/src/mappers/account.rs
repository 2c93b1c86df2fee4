//! Account entity <-> model mapper

use iam_core::entities::Account;
use iam_core::value_objects::Role;

use crate::models::AccountModel;

/// Convert database role string to the Role enum
pub fn parse_role(role_str: &str) -> Role {
    match role_str {
        "admin" => Role::Admin,
        _ => Role::User,
    }
}

/// Convert Role enum to database string
pub fn role_to_str(role: Role) -> &'static str {
    role.as_str()
}

/// Convert AccountModel to Account entity. The password hash stays behind
/// in the model; entities never carry it.
impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            phone_number: model.phone_number,
            avatar: model.avatar,
            role: parse_role(&model.role),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin"), Role::Admin);
        assert_eq!(parse_role("user"), Role::User);
        // Unknown values fall back to the least-privileged role
        assert_eq!(parse_role("owner"), Role::User);
    }
}
