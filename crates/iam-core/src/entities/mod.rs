//! Domain entities

mod account;
mod refresh_token;

pub use account::Account;
pub use refresh_token::RefreshTokenRecord;
