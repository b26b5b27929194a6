//! Value coercion between JSON kinds.
//!
//! Only lossless or conventional conversions are attempted. Anything else
//! yields `None` and the caller falls back to the default value.

use crate::schema::ValueKind;
use serde_json::{Number, Value};

/// Convert `value` into a value of kind `target`.
///
/// Returns `None` when no conversion exists.
///
/// # Examples
///
/// ```
/// use keepconf::repair::coerce;
/// use keepconf::schema::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(coerce(&json!("45"), ValueKind::Integer), Some(json!(45)));
/// assert_eq!(coerce(&json!("yes"), ValueKind::Bool), Some(json!(true)));
/// assert_eq!(coerce(&json!([1]), ValueKind::String), None);
/// ```
#[must_use]
pub fn coerce(value: &Value, target: ValueKind) -> Option<Value> {
    match target {
        ValueKind::Bool => to_bool(value).map(Value::Bool),
        ValueKind::Integer => to_integer(value),
        ValueKind::Float => to_float(value),
        ValueKind::String => to_string(value).map(Value::String),
        ValueKind::Null => Some(value.clone()),
        ValueKind::Array | ValueKind::Object => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Value::from)
                .or_else(|_| s.parse::<u64>().map(Value::from))
                .ok()
        }
        Value::Number(n) => {
            let f = n.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
            (f.is_finite() && f.fract() == 0.0 && in_range).then(|| Value::from(f as i64))
        }
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_from_strings() {
        for s in ["true", "TRUE", " yes ", "on", "1"] {
            assert_eq!(coerce(&json!(s), ValueKind::Bool), Some(json!(true)), "{s}");
        }
        for s in ["false", "No", "off", "0"] {
            assert_eq!(coerce(&json!(s), ValueKind::Bool), Some(json!(false)), "{s}");
        }
        assert_eq!(coerce(&json!("maybe"), ValueKind::Bool), None);
    }

    #[test]
    fn test_bool_from_numbers() {
        assert_eq!(coerce(&json!(1), ValueKind::Bool), Some(json!(true)));
        assert_eq!(coerce(&json!(0), ValueKind::Bool), Some(json!(false)));
        assert_eq!(coerce(&json!(2), ValueKind::Bool), None);
        assert_eq!(coerce(&json!(-1), ValueKind::Bool), None);
        assert_eq!(coerce(&json!(1.0), ValueKind::Bool), None);
    }

    #[test]
    fn test_integer_from_strings() {
        assert_eq!(coerce(&json!("30"), ValueKind::Integer), Some(json!(30)));
        assert_eq!(coerce(&json!(" -7 "), ValueKind::Integer), Some(json!(-7)));
        assert_eq!(
            coerce(&json!("18446744073709551615"), ValueKind::Integer),
            Some(json!(u64::MAX))
        );
        assert_eq!(coerce(&json!("3.5"), ValueKind::Integer), None);
        assert_eq!(coerce(&json!("thirty"), ValueKind::Integer), None);
    }

    #[test]
    fn test_integer_from_floats() {
        assert_eq!(coerce(&json!(30.0), ValueKind::Integer), Some(json!(30)));
        assert_eq!(coerce(&json!(-2.0), ValueKind::Integer), Some(json!(-2)));
        assert_eq!(coerce(&json!(30.5), ValueKind::Integer), None);
        assert_eq!(coerce(&json!(1e300), ValueKind::Integer), None);
    }

    #[test]
    fn test_integer_from_bool() {
        assert_eq!(coerce(&json!(true), ValueKind::Integer), Some(json!(1)));
        assert_eq!(coerce(&json!(false), ValueKind::Integer), Some(json!(0)));
    }

    #[test]
    fn test_float_from_strings() {
        assert_eq!(coerce(&json!("0.25"), ValueKind::Float), Some(json!(0.25)));
        assert_eq!(coerce(&json!("NaN"), ValueKind::Float), None);
        assert_eq!(coerce(&json!("inf"), ValueKind::Float), None);
        assert_eq!(coerce(&json!(true), ValueKind::Float), None);
    }

    #[test]
    fn test_string_from_scalars() {
        assert_eq!(coerce(&json!(true), ValueKind::String), Some(json!("true")));
        assert_eq!(coerce(&json!(42), ValueKind::String), Some(json!("42")));
        assert_eq!(coerce(&json!(1.5), ValueKind::String), Some(json!("1.5")));
        assert_eq!(coerce(&json!(null), ValueKind::String), None);
        assert_eq!(coerce(&json!({"a": 1}), ValueKind::String), None);
    }

    #[test]
    fn test_containers_never_coerce() {
        assert_eq!(coerce(&json!("[1,2]"), ValueKind::Array), None);
        assert_eq!(coerce(&json!("{}"), ValueKind::Object), None);
    }

    #[test]
    fn test_coerced_value_has_target_kind() {
        let cases = [
            (json!("1"), ValueKind::Bool),
            (json!("12"), ValueKind::Integer),
            (json!("1.5"), ValueKind::Float),
            (json!(12), ValueKind::String),
        ];
        for (value, target) in cases {
            let coerced = coerce(&value, target).unwrap();
            assert!(target.accepts(ValueKind::of(&coerced)));
        }
    }
}
