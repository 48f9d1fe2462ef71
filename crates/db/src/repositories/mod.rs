//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//!
//! The invoice and payment repositories own the recomputation discipline:
//! every mutation re-derives the cached invoice fields from authoritative
//! inputs inside the same transaction, holding a row lock on the invoice.

pub mod customer;
pub mod invoice;
pub mod payment;
pub mod sequence;
pub mod user;

pub use customer::{CreateCustomerInput, CustomerRepository, UpdateCustomerInput};
pub use invoice::{InvoiceFilter, InvoiceRepository, UpdateInvoiceInput};
pub use payment::{AddPaymentInput, PaymentRepository};
pub use sequence::SequenceRepository;
pub use user::UserRepository;

use sea_orm::DbErr;
use taajir_core::invoice::InvoiceError;

/// Maps a database error into the domain error space.
pub(crate) fn db_err(err: DbErr) -> InvoiceError {
    InvoiceError::Database(err.to_string())
}
