//! The invoice financial state engine.
//!
//! Every invoice variant (sales, freight, transport, Dubai transport, Dubai
//! clearance) shares one computation rule: derived fields are recomputed from
//! authoritative inputs at every mutation site, never patched incrementally.

pub mod compute;
pub mod error;
pub mod number;
pub mod service;
pub mod types;

#[cfg(test)]
mod compute_props;

pub use compute::{compute_invoice_aggregates, derive_status};
pub use error::InvoiceError;
pub use number::format_invoice_number;
pub use service::{CreateInvoiceInput, CustomerInfo, InvoiceService};
pub use types::{
    ComputeInput, DualCurrencyMirror, InvoiceAggregates, InvoiceKind, InvoiceStatus, Principal,
    VariantSpec,
};
