//! Total type coercions. None of these fail: input that cannot be converted yields `None`, which
//! the registered operations turn into `null`.
use super::arity;
use crate::registry::Registry;
use crate::value::{self, float, truthy, Number};
use serde_json::Value;

/// `null` stays absent, strings are returned as is and everything else becomes its JSON text.
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(value::text(other)),
    }
}

/// true only for `true`, the number 1 and the strings `"True"` and `"true"`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(_) => Number::from_value(value).map_or(false, |n| n.as_f64() == 1.0),
        Value::String(s) => s == "True" || s == "true",
        _ => false,
    }
}

pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) => Number::from_value(value).map(Number::as_f64),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// truncates towards zero; strings such as `"1.23e7"` are read as floats first.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => match Number::from_value(value)? {
            Number::Int(i) => Some(i),
            Number::Float(f) => truncate(f),
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| to_float(value).and_then(truncate)),
        other => to_float(other).and_then(truncate),
    }
}

/// like [`to_float`] but integral results collapse to integers. Numbers pass through untouched.
pub fn to_number(value: &Value) -> Option<Value> {
    if let Some(n) = Number::from_value(value) {
        return Some(n.into_value());
    }
    let f = to_float(value)?;
    if f.fract() == 0.0 {
        if let Some(i) = truncate(f) {
            return Some(Value::from(i));
        }
    }
    Some(float(f))
}

#[inline]
fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

pub(crate) fn install(registry: &mut Registry) {
    registry
        .register("toString", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(to_string(v).map_or(Value::Null, Value::String))
        })
        .register("toBool", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(Value::Bool(to_bool(v)))
        })
        .register("toFloat", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(to_float(v).map_or(Value::Null, float))
        })
        .register("toInt", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(to_int(v).map_or(Value::Null, Value::from))
        })
        .register("toNumber", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(to_number(v).unwrap_or(Value::Null))
        })
        .register("and", |v: &Value, args: &[Value]| {
            Ok(Value::Bool(truthy(v) && args.iter().all(truthy)))
        })
        .register("or", |v: &Value, args: &[Value]| {
            Ok(Value::Bool(truthy(v) || args.iter().any(truthy)))
        })
        .register_maybe("not", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(Value::Bool(!truthy(v)))
        })
        .register("isNull", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(Value::Bool(v.is_null()))
        })
        .register("default", |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            Ok(if v.is_null() {
                args[0].clone()
            } else {
                v.clone()
            })
        })
        // NaN has no JSON form, the fallback therefore serializes as null
        .register("defaultNan", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(if v.is_null() {
                float(f64::NAN)
            } else {
                v.clone()
            })
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_bool() {
        assert!(to_bool(&json!("True")));
        assert!(to_bool(&json!("true")));
        assert!(to_bool(&json!(1)));
        assert!(to_bool(&json!(1.0)));
        assert!(!to_bool(&json!("False")));
        assert!(!to_bool(&json!("false")));
        assert!(!to_bool(&json!("t")));
        assert!(!to_bool(&json!("y")));
        assert!(!to_bool(&json!(2)));
        assert!(!to_bool(&Value::Null));
    }

    #[test]
    fn test_to_int() {
        assert_eq!(Some(1), to_int(&json!("1")));
        assert_eq!(Some(0), to_int(&json!("0")));
        assert_eq!(Some(-1), to_int(&json!("-1")));
        assert_eq!(Some(1), to_int(&json!("1.1")));
        assert_eq!(Some(1), to_int(&json!(1.1)));
        assert_eq!(Some(12300000), to_int(&json!("1.23e7")));
        assert_eq!(Some(1), to_int(&json!(true)));
        assert_eq!(None, to_int(&json!("abc")));
        assert_eq!(None, to_int(&json!([1])));
        assert_eq!(None, to_int(&Value::Null));
    }

    #[test]
    fn test_to_float() {
        assert_eq!(Some(1.0), to_float(&json!("1")));
        assert_eq!(Some(0.0), to_float(&json!("0")));
        assert_eq!(Some(-1.0), to_float(&json!("-1")));
        assert_eq!(Some(1.1), to_float(&json!("1.1")));
        assert_eq!(Some(1.1), to_float(&json!(1.1)));
        assert_eq!(Some(12300000.0), to_float(&json!("1.23e7")));
        assert_eq!(Some(66.0), to_float(&json!(" 66.0 ")));
        assert_eq!(None, to_float(&json!("66.0 F")));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Some(json!(1)), to_number(&json!("1")));
        assert_eq!(Some(json!(0)), to_number(&json!("0")));
        assert_eq!(Some(json!(-1)), to_number(&json!("-1")));
        assert_eq!(Some(json!(1.1)), to_number(&json!("1.1")));
        assert_eq!(Some(json!(1.1)), to_number(&json!(1.1)));
        assert_eq!(Some(json!(12300000)), to_number(&json!("1.23e7")));
        assert_eq!(Some(json!(2.0)), to_number(&json!(2.0)));
        assert_eq!(None, to_number(&json!("x")));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(None, to_string(&Value::Null));
        assert_eq!(Some(String::new()), to_string(&json!("")));
        assert_eq!(Some(String::from("3")), to_string(&json!(3)));
        assert_eq!(Some(String::from("2.5")), to_string(&json!(2.5)));
        assert_eq!(Some(String::from("true")), to_string(&json!(true)));
        assert_eq!(Some(String::from(r#"{"a":1}"#)), to_string(&json!({"a": 1})));
    }
}
