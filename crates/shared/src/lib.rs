//! Shared types, errors, and configuration for Sakiewka.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency codes for wallet bookkeeping
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - JWT claims and token services
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
