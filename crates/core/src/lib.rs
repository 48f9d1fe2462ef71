//! Core business logic for Taajir.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `invoice` - The invoice financial state engine: aggregate computation and
//!   status derivation shared by all five invoice variants
//! - `payment` - Payment ledger guards and recomputation from the payment set
//! - `currency` - PKR/AED conversion with a per-invoice rate
//! - `rounding` - Ceiling-to-2-decimals presentation policy for API responses
//! - `auth` - Password hashing for login and privileged re-authentication

pub mod auth;
pub mod currency;
pub mod invoice;
pub mod payment;
pub mod rounding;
