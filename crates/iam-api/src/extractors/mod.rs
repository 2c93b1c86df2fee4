//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and typed parameters.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{AdminUser, AuthUser};
pub use path::AccountIdPath;
pub use query::ApiQuery;
pub use validated::ValidatedJson;
