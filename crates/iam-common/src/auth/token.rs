//! Opaque refresh token generation
//!
//! Refresh tokens carry no embedded structure: they are random values that
//! only mean something to the persistence layer. 32 bytes of OS entropy,
//! hex-encoded, so collisions are negligible and the database uniqueness
//! constraint is only a backstop.

use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy per refresh token (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new opaque refresh token value
#[must_use]
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_hex_of_expected_length() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_refresh_token()).collect();
        assert_eq!(tokens.len(), 100);
    }
}
