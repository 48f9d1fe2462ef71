//! Ceiling-to-2-decimals presentation policy.
//!
//! Money values are rounded *up* at the API boundary so floating-point
//! representation can never under-report an amount client-side. This is
//! strictly a presentation concern: core functions return exact decimals and
//! this transform is applied as an explicit serialization step, not a global
//! hook.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Keys whose values are opaque identifiers and must never be rewritten,
/// even when they happen to look numeric.
const OPAQUE_KEYS: [&str; 4] = ["id", "invoice_number", "trn", "reference"];

/// Rounds a decimal up to 2 places (ceiling toward positive infinity).
///
/// `1.001` becomes `1.01`; `-1.005` becomes `-1` (ceiling moves toward
/// positive infinity). Idempotent: applying it twice changes nothing.
#[must_use]
pub fn ceil_2dp(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
        .normalize()
}

/// Recursively rounds every numeric leaf of a JSON payload up to 2 decimals.
///
/// - Integers pass through unchanged
/// - Fractional numbers (and numeric strings, as produced by decimal
///   serialization) are ceiled to 2 places
/// - Values under opaque identifier keys (`id`, `*_id`, `invoice_number`,
///   `trn`, `reference`) are never touched
pub fn round_money_payload(payload: &mut Value) {
    walk(payload, None);
}

fn is_opaque_key(key: &str) -> bool {
    OPAQUE_KEYS.contains(&key) || key.ends_with("_id")
}

fn walk(value: &mut Value, key: Option<&str>) {
    if key.is_some_and(is_opaque_key) {
        return;
    }

    match value {
        Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                walk(v, Some(k));
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                walk(item, key);
            }
        }
        Value::Number(n) => {
            // Integers pass through untouched.
            if n.is_i64() || n.is_u64() {
                return;
            }
            if let Some(rounded) = n
                .as_f64()
                .and_then(|f| Decimal::try_from(f).ok())
                .map(ceil_2dp)
                .and_then(|d| d.to_f64())
                .and_then(serde_json::Number::from_f64)
            {
                *n = rounded;
            }
        }
        Value::String(s) => {
            // Decimal fields serialize as strings; rewrite only values that
            // parse cleanly and carry a fractional part.
            if let Ok(parsed) = s.parse::<Decimal>() {
                if parsed.fract() != Decimal::ZERO {
                    *s = ceil_2dp(parsed).to_string();
                }
            }
        }
        Value::Bool(_) | Value::Null => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_ceil_rounds_up() {
        assert_eq!(ceil_2dp(dec!(1.001)), dec!(1.01));
        assert_eq!(ceil_2dp(dec!(1.2)), dec!(1.2));
        assert_eq!(ceil_2dp(dec!(1.20)), dec!(1.2));
        assert_eq!(ceil_2dp(dec!(99.999)), dec!(100));
    }

    #[test]
    fn test_ceil_negative_moves_toward_positive_infinity() {
        // Ceiling semantics: -1.005 -> -1.00 (up, not away from zero).
        assert_eq!(ceil_2dp(dec!(-1.005)), dec!(-1));
        assert_eq!(ceil_2dp(dec!(-1.239)), dec!(-1.23));
    }

    #[test]
    fn test_ceil_is_idempotent() {
        let once = ceil_2dp(dec!(3.14159));
        assert_eq!(ceil_2dp(once), once);
    }

    #[test]
    fn test_payload_integers_untouched() {
        let mut payload = json!({ "count": 42, "page": 1 });
        round_money_payload(&mut payload);
        assert_eq!(payload, json!({ "count": 42, "page": 1 }));
    }

    #[test]
    fn test_payload_fractions_rounded_up() {
        let mut payload = json!({ "gross_amount": 1.001, "nested": { "vat": 2.345 } });
        round_money_payload(&mut payload);
        assert_eq!(payload["gross_amount"], json!(1.01));
        assert_eq!(payload["nested"]["vat"], json!(2.35));
    }

    #[test]
    fn test_payload_decimal_strings_rounded_up() {
        let mut payload = json!({ "outstanding_amount": "549.991" });
        round_money_payload(&mut payload);
        assert_eq!(payload["outstanding_amount"], json!("550"));
    }

    #[test]
    fn test_payload_arrays_walked() {
        let mut payload = json!({ "amounts": [1.001, 2.0, 3] });
        round_money_payload(&mut payload);
        assert_eq!(payload["amounts"], json!([1.01, 2.0, 3]));
    }

    #[test]
    fn test_opaque_ids_never_rewritten() {
        let mut payload = json!({
            "id": "018f1c32-0000-7000-8000-000000000000",
            "customer_id": "42.5",
            "invoice_number": "INV-000123",
            "trn": "100123456700003",
            "amount": "42.555"
        });
        round_money_payload(&mut payload);
        assert_eq!(payload["customer_id"], json!("42.5"));
        assert_eq!(payload["trn"], json!("100123456700003"));
        assert_eq!(payload["amount"], json!("42.56"));
    }

    #[test]
    fn test_non_numeric_strings_untouched() {
        let mut payload = json!({ "notes": "paid 50% upfront", "status": "unpaid" });
        let before = payload.clone();
        round_money_payload(&mut payload);
        assert_eq!(payload, before);
    }

    #[test]
    fn test_payload_transform_is_idempotent() {
        let mut payload = json!({ "a": 1.001, "b": "2.345", "c": [9.999] });
        round_money_payload(&mut payload);
        let once = payload.clone();
        round_money_payload(&mut payload);
        assert_eq!(payload, once);
    }
}
