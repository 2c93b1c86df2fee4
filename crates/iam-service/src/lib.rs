//! # iam-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::context::{ServiceContext, ServiceContextBuilder};
pub use services::error::{ServiceError, ServiceResult};
pub use services::{AccountService, AuthService};
