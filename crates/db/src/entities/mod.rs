//! `SeaORM` entity definitions.

pub mod customers;
pub mod daily_ledger_entries;
pub mod invoices;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod sequence_counters;
pub mod users;
