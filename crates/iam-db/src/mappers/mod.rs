//! Entity ↔ model mappers

mod account;
mod refresh_token;

pub use account::{parse_role, role_to_str};
