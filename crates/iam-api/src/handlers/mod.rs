//! Request handlers organized by domain

pub mod accounts;
pub mod auth;
pub mod health;
