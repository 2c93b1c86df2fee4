//! Refresh token record - a stored, single-use session credential

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A live refresh token. Records are deleted on consumption, expiry
/// detection, or revocation; there is no "used but retained" state, so a
/// row existing in the store is the liveness predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Opaque random token value. Unique across live records.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(
        account_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            token,
            expires_at,
            created_at,
        }
    }

    /// Check expiry against an externally supplied instant so callers can
    /// use an injected clock.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let record = RefreshTokenRecord::new(
            Uuid::new_v4(),
            "deadbeef".to_string(),
            now + Duration::seconds(30),
            now,
        );

        assert!(!record.is_expired_at(now));
        assert!(!record.is_expired_at(now + Duration::seconds(29)));
        // Expiry is "at or after" the embedded timestamp
        assert!(record.is_expired_at(now + Duration::seconds(30)));
        assert!(record.is_expired_at(now + Duration::seconds(31)));
    }
}
