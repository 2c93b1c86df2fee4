//! Value objects for the domain layer

mod role;

pub use role::{Role, RoleParseError};
