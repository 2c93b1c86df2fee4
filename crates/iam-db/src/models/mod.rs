//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod refresh_token;

pub use account::AccountModel;
pub use refresh_token::RefreshTokenModel;
