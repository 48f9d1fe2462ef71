//! Shared types, errors, and configuration for Taajir.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes with decimal-only money handling
//! - Pagination types for list endpoints
//! - JWT claims and token service
//! - Configuration management

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
