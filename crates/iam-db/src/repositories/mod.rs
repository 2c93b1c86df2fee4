//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in iam-core.

mod account;
mod error;
mod refresh_token;

pub use account::PgAccountRepository;
pub use refresh_token::PgRefreshTokenRepository;
