//! Authentication primitives
//!
//! Password hashing, access token encode/verify, and opaque refresh token
//! generation.

mod jwt;
mod password;
mod token;

pub use jwt::{AccessClaims, JwtService, TokenPair};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordService,
};
pub use token::{generate_refresh_token, REFRESH_TOKEN_BYTES};
