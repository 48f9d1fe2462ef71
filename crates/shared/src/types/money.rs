//! Currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`.

use serde::{Deserialize, Serialize};

/// Currencies the trading company operates in.
///
/// Pakistan-side invoices (freight, transport) are denominated in PKR and
/// mirrored into AED through a per-invoice conversion rate; Dubai-side
/// invoices are denominated in AED directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Pakistani Rupee
    Pkr,
    /// UAE Dirham
    Aed,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pkr => write!(f, "PKR"),
            Self::Aed => write!(f, "AED"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PKR" => Ok(Self::Pkr),
            "AED" => Ok(Self::Aed),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Pkr.to_string(), "PKR");
        assert_eq!(Currency::Aed.to_string(), "AED");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("PKR").unwrap(), Currency::Pkr);
        assert_eq!(Currency::from_str("aed").unwrap(), Currency::Aed);
        assert!(Currency::from_str("USD").is_err());
        assert!(Currency::from_str("").is_err());
    }

}
