//! Password hashing and verification
//!
//! Uses Argon2id for salted, work-factor-tunable password hashing (OWASP
//! recommended). Each hash embeds its own random salt, so hashing the same
//! plaintext twice yields different strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error only on internal failure (e.g. the entropy source is
/// unavailable); never for a well-formed password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// A mismatch is `Ok(false)`, not an error. The comparison inside
/// `Argon2::verify_password` is constant-time with respect to the hash
/// output, so timing does not reveal how much of the hash matched.
///
/// # Errors
/// Returns an error only if the stored hash is structurally invalid.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Credential verifier handle for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Verify a password against a hash
    ///
    /// # Errors
    /// Returns an error if the hash is structurally invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
    }
}

/// Validate password strength
///
/// Mirrors the registration policy: 8-72 characters with at least one
/// letter and one digit.
///
/// # Errors
/// Returns a validation error if the password doesn't meet requirements
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 72 {
        return Err(AppError::Validation(
            "Password must be at most 72 characters long".to_string(),
        ));
    }

    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_salts_per_call() {
        let password = "correcthorse1";
        let hash = hash_password(password).unwrap();

        // Hash should start with argon2 identifier
        assert!(hash.starts_with("$argon2"));
        // Hash should be different each time (different salt)
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash, hash2);
    }

    #[test]
    fn test_verify_password_success() {
        let password = "correcthorse1";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_mismatch_is_false_not_error() {
        let hash = hash_password("correcthorse1").unwrap();

        assert!(!verify_password("wronghorse2", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_structurally_invalid_hash() {
        let result = verify_password("whatever1", "not-a-phc-string");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_service() {
        let service = PasswordService::new();
        let hash = service.hash("correcthorse1").unwrap();
        assert!(service.verify("correcthorse1", &hash).unwrap());
        assert!(!service.verify("other", &hash).unwrap());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("correcthorse1").is_ok());
        assert!(validate_password_strength("password123").is_ok());

        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("nodigitshere").is_err());
        assert!(validate_password_strength("1234567890").is_err());
    }
}
