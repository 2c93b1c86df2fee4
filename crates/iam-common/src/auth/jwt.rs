//! Access token encode/verify using the `jsonwebtoken` crate
//!
//! Access tokens are stateless: verification recomputes the signature over
//! the encoded payload and checks expiry against the injected clock, with
//! no persistent lookup. Expiry checking is done here rather than by
//! `jsonwebtoken` so that tests can drive time deterministically.

use std::sync::Arc;

use chrono::Duration;
use iam_core::{Account, Clock, Role};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Identity claims embedded in an access token.
///
/// Never persisted; exists only inside the signed token and in memory
/// while a request is being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Get the account ID as a Uuid
    ///
    /// # Errors
    /// Returns `TokenMalformed` if the subject is not a valid uuid
    pub fn account_id(&self) -> Result<Uuid, AppError> {
        self.sub.parse().map_err(|_| AppError::TokenMalformed)
    }
}

/// Token pair returned on every successful login/refresh. Both members are
/// replaced together; a refresh never renews in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Signs and verifies access tokens (HS256)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: i64,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// Create a new JWT service with the given secret and access token TTL
    /// (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_ttl: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
            clock,
        }
    }

    /// Access token lifetime in seconds
    #[must_use]
    pub fn access_token_ttl(&self) -> i64 {
        self.access_token_ttl
    }

    /// Encode identity claims for an account into a signed token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, account: &Account) -> Result<String, AppError> {
        let now = self.clock.now();
        let claims = AccessClaims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            role: account.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_ttl)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode access token")))
    }

    /// Decode a token, verify its signature, and check expiry
    ///
    /// # Errors
    /// - `TokenMalformed` if the structural encoding is invalid
    /// - `TokenSignatureMismatch` if the signature does not match
    /// - `TokenExpired` if the current time is at or after the embedded expiry
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AppError> {
        // Expiry is checked below against the injected clock, not by the
        // library against system time.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::TokenSignatureMismatch
                    }
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::TokenMalformed,
                }
            })?;

        let claims = token_data.claims;
        if self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Deterministic clock for expiry tests
    struct TestClock {
        now: AtomicI64,
    }

    impl TestClock {
        fn at(timestamp: i64) -> Arc<Self> {
            Arc::new(Self {
                now: AtomicI64::new(timestamp),
            })
        }

        fn advance(&self, seconds: i64) {
            self.now.fetch_add(seconds, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.now.load(Ordering::SeqCst), 0).unwrap()
        }
    }

    const T0: i64 = 1_700_000_000;

    fn test_account() -> Account {
        Account::new(
            Uuid::new_v4(),
            "alice@example.com".to_string(),
            "Alice Example".to_string(),
            Utc.timestamp_opt(T0, 0).unwrap(),
        )
    }

    fn service_with_clock(secret: &str, ttl: i64) -> (JwtService, Arc<TestClock>) {
        let clock = TestClock::at(T0);
        (JwtService::new(secret, ttl, clock.clone()), clock)
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let (service, _clock) = service_with_clock("test-secret-key-that-is-long-enough", 900);
        let account = test_account();

        let token = service.issue(&account).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.account_id().unwrap(), account.id);
        assert_eq!(claims.email, account.email);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iat, T0);
        assert_eq!(claims.exp, T0 + 900);
    }

    #[test]
    fn test_verify_with_wrong_secret_is_signature_mismatch() {
        let (issuer, _) = service_with_clock("secret-one-that-is-long-enough!!", 900);
        let (verifier, _) = service_with_clock("secret-two-that-is-long-enough!!", 900);

        let token = issuer.issue(&test_account()).unwrap();
        let result = verifier.verify(&token);

        assert!(matches!(result, Err(AppError::TokenSignatureMismatch)));
    }

    #[test]
    fn test_verify_expired_token() {
        let (service, clock) = service_with_clock("test-secret-key-that-is-long-enough", 900);
        let token = service.issue(&test_account()).unwrap();

        clock.advance(899);
        assert!(service.verify(&token).is_ok());

        // Expiry is "at or after"
        clock.advance(1);
        assert!(matches!(service.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_verify_garbage_is_malformed() {
        let (service, _) = service_with_clock("test-secret-key-that-is-long-enough", 900);

        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::TokenMalformed)
        ));
        assert!(matches!(service.verify(""), Err(AppError::TokenMalformed)));
    }

    #[test]
    fn test_payload_swap_invalidates_signature() {
        let (service, _) = service_with_clock("test-secret-key-that-is-long-enough", 900);

        let mut alice = test_account();
        alice.email = "alice@example.com".to_string();
        let mut mallory = test_account();
        mallory.email = "mallory@example.com".to_string();

        let token_a = service.issue(&alice).unwrap();
        let token_m = service.issue(&mallory).unwrap();

        // Graft mallory's payload onto alice's signature
        let parts_a: Vec<&str> = token_a.split('.').collect();
        let parts_m: Vec<&str> = token_m.split('.').collect();
        let forged = format!("{}.{}.{}", parts_a[0], parts_m[1], parts_a[2]);

        assert!(matches!(
            service.verify(&forged),
            Err(AppError::TokenSignatureMismatch)
        ));
    }

    #[test]
    fn test_claims_account_id_rejects_bad_subject() {
        let claims = AccessClaims {
            sub: "not-a-uuid".to_string(),
            email: "x@example.com".to_string(),
            role: Role::User,
            iat: 0,
            exp: i64::MAX,
        };

        assert!(matches!(claims.account_id(), Err(AppError::TokenMalformed)));
    }

    #[test]
    fn test_token_pair_defaults_to_bearer() {
        let pair = TokenPair::new("a".to_string(), "r".to_string(), 900);
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
    }
}
