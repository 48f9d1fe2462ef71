//! Payment ledger rules.
//!
//! Payments are append-only records against one invoice. Cumulative figures
//! are always re-summed over the authoritative payment set after insert and
//! delete, never adjusted by deltas.

pub mod service;
pub mod types;

pub use service::PaymentService;
pub use types::{LedgerSide, PaymentMethod, PaymentRecord, PaymentTotals, PaymentType};
