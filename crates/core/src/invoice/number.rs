//! Human-readable invoice number formatting.
//!
//! Formatting is a pure function applied after the atomic sequence increment,
//! never part of it.

/// Formats a sequence value as `PREFIX-000123`.
#[must_use]
pub fn format_invoice_number(prefix: &str, sequence: i64) -> String {
    format!("{prefix}-{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceKind;
    use rstest::rstest;

    #[test]
    fn test_zero_padding() {
        assert_eq!(format_invoice_number("INV", 123), "INV-000123");
        assert_eq!(format_invoice_number("FRT", 1), "FRT-000001");
    }

    #[test]
    fn test_wide_sequences_are_not_truncated() {
        assert_eq!(format_invoice_number("INV", 1_234_567), "INV-1234567");
    }

    #[rstest]
    #[case(InvoiceKind::Sales, "INV-000007")]
    #[case(InvoiceKind::Freight, "FRT-000007")]
    #[case(InvoiceKind::Transport, "TRP-000007")]
    #[case(InvoiceKind::DubaiTransport, "DTR-000007")]
    #[case(InvoiceKind::DubaiClearance, "DCL-000007")]
    fn test_variant_prefixes(#[case] kind: InvoiceKind, #[case] expected: &str) {
        assert_eq!(
            format_invoice_number(kind.variant().number_prefix, 7),
            expected
        );
    }
}
