//! Invoice and payment error types.
//!
//! All business-rule checks happen before any mutation; these errors carry the
//! offending values so API messages can include them.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during invoice and payment operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    // ========== Validation Errors ==========
    /// Principal amount (or quantity * rate) must be positive.
    #[error("Invoice principal amount must be positive")]
    NonPositivePrincipal,

    /// Discount cannot be negative.
    #[error("Discount cannot be negative")]
    NegativeDiscount,

    /// Amounts exceed the representable decimal range.
    #[error("Invoice amounts are too large to process")]
    AmountOutOfRange,

    /// VAT percentage must be between 0 and 100.
    #[error("VAT percentage must be between 0 and 100, got {0}")]
    InvalidVatPercentage(Decimal),

    /// Due date cannot precede the invoice date.
    #[error("Due date cannot be before the invoice date")]
    DueDateBeforeInvoiceDate,

    /// PKR-denominated invoices require a conversion rate.
    #[error("A PKR to AED conversion rate is required for this invoice type")]
    MissingConversionRate,

    /// Conversion rate must be positive.
    #[error("Conversion rate must be positive, got {0}")]
    InvalidConversionRate(Decimal),

    // ========== Business Rule Violations ==========
    /// Invoice number already in use.
    #[error("Invoice number '{0}' is already in use")]
    DuplicateInvoiceNumber(String),

    /// Customer must have a TRN before a VAT-bearing invoice can be created.
    #[error("Customer '{customer}' has no TRN on file; a TRN is required for VAT invoices")]
    TrnRequired {
        /// The customer's display name.
        customer: String,
    },

    /// Invoice is already fully paid; no further payments accepted.
    #[error("Invoice '{invoice_number}' is already fully paid")]
    AlreadyPaid {
        /// The human-readable invoice number.
        invoice_number: String,
    },

    /// A payment must carry a positive amount or a positive discount.
    #[error("Payment must have a positive amount or a positive discount")]
    EmptyPayment,

    /// Payment plus discount exceeds the outstanding amount.
    #[error("Payment of {attempted} exceeds the outstanding amount of {limit}")]
    Overpayment {
        /// Amount plus discount the caller attempted to apply.
        attempted: Decimal,
        /// The invoice's current outstanding amount.
        limit: Decimal,
    },

    /// Per-payment discounts are only supported on sales invoices.
    #[error("Per-payment discounts are not supported for this invoice type")]
    DiscountNotSupported,

    // ========== Not Found ==========
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    // ========== Authorization ==========
    /// Re-entered credential did not verify.
    ///
    /// Deliberately opaque: never indicates which part of the check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ========== Infrastructure ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InvoiceError {
    /// Returns the machine-readable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePrincipal => "NON_POSITIVE_PRINCIPAL",
            Self::NegativeDiscount => "NEGATIVE_DISCOUNT",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::InvalidVatPercentage(_) => "INVALID_VAT_PERCENTAGE",
            Self::DueDateBeforeInvoiceDate => "DUE_DATE_BEFORE_INVOICE_DATE",
            Self::MissingConversionRate => "MISSING_CONVERSION_RATE",
            Self::InvalidConversionRate(_) => "INVALID_CONVERSION_RATE",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::TrnRequired { .. } => "TRN_REQUIRED",
            Self::AlreadyPaid { .. } => "ALREADY_FULLY_PAID",
            Self::EmptyPayment => "EMPTY_PAYMENT",
            Self::Overpayment { .. } => "PAYMENT_EXCEEDS_OUTSTANDING",
            Self::DiscountNotSupported => "DISCOUNT_NOT_SUPPORTED",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and business rule errors
            Self::NonPositivePrincipal
            | Self::NegativeDiscount
            | Self::AmountOutOfRange
            | Self::InvalidVatPercentage(_)
            | Self::DueDateBeforeInvoiceDate
            | Self::MissingConversionRate
            | Self::InvalidConversionRate(_)
            | Self::TrnRequired { .. }
            | Self::AlreadyPaid { .. }
            | Self::EmptyPayment
            | Self::Overpayment { .. }
            | Self::DiscountNotSupported => 400,

            // 401 Unauthorized - failed re-authentication
            Self::InvalidCredentials => 401,

            // 404 Not Found
            Self::InvoiceNotFound(_) | Self::PaymentNotFound(_) | Self::CustomerNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateInvoiceNumber(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            InvoiceError::AlreadyPaid {
                invoice_number: "INV-000001".into()
            }
            .error_code(),
            "ALREADY_FULLY_PAID"
        );
        assert_eq!(
            InvoiceError::Overpayment {
                attempted: dec!(600),
                limit: dec!(550),
            }
            .error_code(),
            "PAYMENT_EXCEEDS_OUTSTANDING"
        );
        assert_eq!(InvoiceError::EmptyPayment.error_code(), "EMPTY_PAYMENT");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(InvoiceError::EmptyPayment.http_status_code(), 400);
        assert_eq!(InvoiceError::InvalidCredentials.http_status_code(), 401);
        assert_eq!(
            InvoiceError::InvoiceNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            InvoiceError::DuplicateInvoiceNumber("INV-000001".into()).http_status_code(),
            409
        );
        assert_eq!(
            InvoiceError::Database("test".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_overpayment_message_includes_values() {
        let err = InvoiceError::Overpayment {
            attempted: dec!(600.00),
            limit: dec!(550.00),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 600.00 exceeds the outstanding amount of 550.00"
        );
    }

    #[test]
    fn test_invalid_credentials_is_opaque() {
        assert_eq!(InvoiceError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
