//! PKR/AED currency conversion.

pub mod conversion;

pub use conversion::pkr_to_aed;
