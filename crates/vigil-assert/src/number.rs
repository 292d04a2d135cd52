use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// Convert a JSON number to a `Decimal`. Integers are exact; floats go
/// through their shortest decimal rendering so `1.1` stays `1.1`.
///
/// `None` when the value has no exact `Decimal` form (out of range, or too
/// small for 28 fractional digits).
pub fn to_decimal(number: &Number) -> Option<Decimal> {
    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }
    let rendered = number.to_string();
    let decimal = Decimal::from_str(&rendered)
        .or_else(|_| Decimal::from_scientific(&rendered))
        .ok()?;
    // Reject conversions that rounded, e.g. 1e-29 collapsing to 0.
    (decimal.to_f64() == number.as_f64()).then_some(decimal)
}

/// Equality that treats numbers by value (`0 == 0.0`) and everything else
/// structurally.
pub fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (to_decimal(a), to_decimal(b)) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64().is_some_and(|x| b.as_f64() == Some(x)),
        },
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn num(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn integers_are_exact() {
        assert_eq!(to_decimal(&num(json!(0))), Some(dec!(0)));
        assert_eq!(to_decimal(&num(json!(-42))), Some(dec!(-42)));
        assert_eq!(to_decimal(&num(json!(u64::MAX))), Some(Decimal::from(u64::MAX)));
    }

    #[test]
    fn floats_keep_their_decimal_form() {
        assert_eq!(to_decimal(&num(json!(1.1))), Some(dec!(1.1)));
        assert_eq!(to_decimal(&num(json!(0.0))), Some(dec!(0)));
    }

    #[test]
    fn scientific_floats() {
        assert_eq!(to_decimal(&num(json!(1e-7))), Some(dec!(0.0000001)));
    }

    #[test]
    fn values_below_decimal_precision_are_not_rounded() {
        assert_eq!(to_decimal(&num(json!(1e-29))), None);
        assert!(!json_eq(&json!(1e-29), &json!(0)));
        assert!(json_eq(&json!(1e-29), &json!(1e-29)));
    }

    #[test]
    fn values_beyond_decimal_range() {
        assert_eq!(to_decimal(&num(json!(1e30))), None);
        assert!(json_eq(&json!(1e30), &json!(1e30)));
        assert!(!json_eq(&json!(1e30), &json!(0)));
    }

    #[test]
    fn numeric_equality_ignores_representation() {
        assert!(json_eq(&json!(0), &json!(0.0)));
        assert!(json_eq(&json!(1.50), &json!(1.5)));
        assert!(!json_eq(&json!(1), &json!(1.0001)));
        assert!(!json_eq(&json!(0), &json!("0")));
        assert!(json_eq(&json!("CRISIS"), &json!("CRISIS")));
    }
}
