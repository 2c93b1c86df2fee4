//! # iam-common
//!
//! Shared utilities including configuration, error handling, authentication
//! primitives, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_refresh_token, hash_password, validate_password_strength, verify_password,
    AccessClaims, JwtService, PasswordService, TokenPair,
};
pub use config::{AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig, ServerConfig};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
