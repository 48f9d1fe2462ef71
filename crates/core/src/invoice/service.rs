//! Invoice validation service.
//!
//! Pure business logic with no database dependencies: persistence lookups are
//! injected as closures, mirroring how the repositories consume this service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::InvoiceError;
use super::types::{InvoiceKind, Principal};

/// Information about a customer needed for validation.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    /// The customer ID.
    pub id: Uuid,
    /// Display name, used in error messages.
    pub name: String,
    /// Tax registration number, required before VAT-bearing invoices.
    pub trn: Option<String>,
}

/// Input for creating or replacing an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The invoice variant.
    pub kind: InvoiceKind,
    /// Explicit invoice number; auto-generated from the sequence when `None`.
    pub invoice_number: Option<String>,
    /// Principal amount or line items.
    pub principal: Principal,
    /// VAT percentage (sales only).
    pub vat_percentage: Decimal,
    /// Flat discount (sales only).
    pub discount: Decimal,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Customer reference; required for sales invoices.
    pub customer_id: Option<Uuid>,
    /// PKR to AED conversion rate for dual-currency variants.
    pub conversion_rate: Option<Decimal>,
}

/// Invoice validation service.
pub struct InvoiceService;

impl InvoiceService {
    /// Validates an invoice before it is created or replaced.
    ///
    /// All business-rule checks happen here, before any mutation:
    /// 1. Principal must be positive
    /// 2. Discount must be non-negative; VAT between 0 and 100
    /// 3. Due date must not precede the invoice date
    /// 4. Dual-currency variants require a positive conversion rate
    /// 5. VAT-bearing sales invoices require the customer's TRN on file
    /// 6. An explicit invoice number must not collide with another invoice
    ///
    /// # Arguments
    ///
    /// * `input` - The invoice input to validate
    /// * `number_taken` - Returns true when the number belongs to another invoice
    /// * `customer_lookup` - Resolves the customer referenced by the invoice
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if any check fails.
    pub fn validate_invoice<N, C>(
        input: &CreateInvoiceInput,
        number_taken: N,
        customer_lookup: C,
    ) -> Result<(), InvoiceError>
    where
        N: Fn(&str) -> Result<bool, InvoiceError>,
        C: Fn(Uuid) -> Result<CustomerInfo, InvoiceError>,
    {
        let variant = input.kind.variant();

        let subtotal = input
            .principal
            .subtotal()
            .ok_or(InvoiceError::AmountOutOfRange)?;
        if subtotal <= Decimal::ZERO {
            return Err(InvoiceError::NonPositivePrincipal);
        }

        if input.discount < Decimal::ZERO {
            return Err(InvoiceError::NegativeDiscount);
        }

        if variant.has_vat
            && (input.vat_percentage < Decimal::ZERO || input.vat_percentage > Decimal::ONE_HUNDRED)
        {
            return Err(InvoiceError::InvalidVatPercentage(input.vat_percentage));
        }

        if input.due_date < input.invoice_date {
            return Err(InvoiceError::DueDateBeforeInvoiceDate);
        }

        if variant.dual_currency {
            match input.conversion_rate {
                None => return Err(InvoiceError::MissingConversionRate),
                Some(rate) if rate <= Decimal::ZERO => {
                    return Err(InvoiceError::InvalidConversionRate(rate));
                }
                Some(_) => {}
            }
        }

        // TRN precondition: a VAT-bearing invoice needs the customer's tax
        // registration number on file.
        if variant.has_vat && input.vat_percentage > Decimal::ZERO {
            let Some(customer_id) = input.customer_id else {
                return Err(InvoiceError::CustomerNotFound(Uuid::nil()));
            };
            let customer = customer_lookup(customer_id)?;
            if customer.trn.as_deref().is_none_or(str::is_empty) {
                return Err(InvoiceError::TrnRequired {
                    customer: customer.name,
                });
            }
        }

        if let Some(number) = input.invoice_number.as_deref() {
            if number.trim().is_empty() {
                return Err(InvoiceError::DuplicateInvoiceNumber(String::new()));
            }
            if number_taken(number)? {
                return Err(InvoiceError::DuplicateInvoiceNumber(number.to_string()));
            }
        }

        Ok(())
    }
}
