use super::arity;
use crate::errors::Result;
use crate::registry::Registry;
use crate::value::{compare, equals, float, integral, Number};
use serde_json::Value;
use std::cmp::Ordering;
use std::convert::TryFrom;

/// registers an operation taking exactly one argument.
fn binary<F>(registry: &mut Registry, name: &str, f: F)
where
    F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
{
    registry.register_maybe(name, move |v: &Value, args: &[Value]| {
        arity(args, 1)?;
        Ok(f(v, &args[0]))
    });
}

/// registers a float to float function.
fn real<F>(registry: &mut Registry, name: &str, f: F)
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    registry.register_maybe(name, move |v: &Value, args: &[Value]| {
        arity(args, 0)?;
        Ok(Number::from_value(v).map_or(Value::Null, |n| float(f(n.as_f64()))))
    });
}

/// integer arithmetic with a float fallback on overflow or mixed operands.
fn arithmetic<I, F>(a: &Value, b: &Value, int: I, flt: F) -> Option<Value>
where
    I: Fn(i64, i64) -> Option<i64>,
    F: Fn(f64, f64) -> f64,
{
    let (x, y) = (Number::from_value(a)?, Number::from_value(b)?);
    Some(match (x, y) {
        (Number::Int(x), Number::Int(y)) => match int(x, y) {
            Some(r) => Value::from(r),
            None => float(flt(x as f64, y as f64)),
        },
        (x, y) => float(flt(x.as_f64(), y.as_f64())),
    })
}

/// the longest string (in bytes) or array `*` builds, anything larger is `null`.
const MAX_REPEAT_LEN: usize = 1 << 24;

fn repeat(v: &Value, times: &Value) -> Option<Value> {
    let n = match Number::from_value(times)? {
        Number::Int(n) => usize::try_from(n.max(0)).ok()?,
        Number::Float(_) => return None,
    };
    let bounded = |len: usize| len.checked_mul(n).filter(|total| *total <= MAX_REPEAT_LEN);
    match v {
        Value::String(s) => {
            bounded(s.len())?;
            Some(Value::String(s.repeat(n)))
        }
        Value::Array(arr) => {
            let total = bounded(arr.len())?;
            Some(Value::Array(arr.iter().cycle().take(total).cloned().collect()))
        }
        _ => None,
    }
}

fn add(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Value::String(format!("{}{}", x, y)),
        (Value::Array(x), Value::Array(y)) => {
            Value::Array(x.iter().chain(y.iter()).cloned().collect())
        }
        _ => arithmetic(a, b, i64::checked_add, |x, y| x + y).unwrap_or(Value::Null),
    }
}

fn multiply(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            arithmetic(a, b, i64::checked_mul, |x, y| x * y).unwrap_or(Value::Null)
        }
        (Value::Number(_), seq) => repeat(seq, a).unwrap_or(Value::Null),
        (seq, Value::Number(_)) => repeat(seq, b).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn divide(a: &Value, b: &Value) -> Value {
    match (Number::from_value(a), Number::from_value(b)) {
        (Some(x), Some(y)) if y.as_f64() != 0.0 => float(x.as_f64() / y.as_f64()),
        _ => Value::Null,
    }
}

fn power(a: &Value, b: &Value) -> Value {
    match (Number::from_value(a), Number::from_value(b)) {
        (Some(Number::Int(x)), Some(Number::Int(y))) if y >= 0 => {
            let exact = if y <= i64::from(u32::MAX) {
                x.checked_pow(y as u32)
            } else {
                None
            };
            exact.map_or_else(|| float((x as f64).powf(y as f64)), Value::from)
        }
        (Some(x), Some(y)) => float(x.as_f64().powf(y.as_f64())),
        _ => Value::Null,
    }
}

/// the remainder takes the sign of the divisor.
fn modulo(a: &Value, b: &Value) -> Value {
    match (Number::from_value(a), Number::from_value(b)) {
        (Some(Number::Int(x)), Some(Number::Int(y))) if y != 0 => match x.checked_rem(y) {
            Some(r) if r != 0 && (r < 0) != (y < 0) => Value::from(r + y),
            Some(r) => Value::from(r),
            None => Value::from(0),
        },
        (Some(x), Some(y)) if y.as_f64() != 0.0 => {
            let (x, y) = (x.as_f64(), y.as_f64());
            let r = x % y;
            float(if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            })
        }
        _ => Value::Null,
    }
}

fn ordering<P>(a: &Value, b: &Value, accept: P) -> Value
where
    P: Fn(Ordering) -> bool,
{
    compare(a, b).map_or(Value::Null, |o| Value::Bool(accept(o)))
}

fn rounding<F>(v: &Value, f: F) -> Value
where
    F: Fn(f64) -> f64,
{
    match Number::from_value(v) {
        Some(Number::Int(i)) => Value::from(i),
        Some(Number::Float(x)) => integral(f(x)),
        None => Value::Null,
    }
}

pub(crate) fn install(registry: &mut Registry) {
    binary(registry, "+", add);
    binary(registry, "-", |a, b| {
        arithmetic(a, b, i64::checked_sub, |x, y| x - y).unwrap_or(Value::Null)
    });
    binary(registry, "*", multiply);
    binary(registry, "/", divide);
    binary(registry, "**", power);
    binary(registry, "%", modulo);

    binary(registry, "==", |a, b| Value::Bool(equals(a, b)));
    binary(registry, "!=", |a, b| Value::Bool(!equals(a, b)));
    binary(registry, "<", |a, b| ordering(a, b, |o| o == Ordering::Less));
    binary(registry, "<=", |a, b| ordering(a, b, |o| o != Ordering::Greater));
    binary(registry, ">", |a, b| ordering(a, b, |o| o == Ordering::Greater));
    binary(registry, ">=", |a, b| ordering(a, b, |o| o != Ordering::Less));

    registry
        .register_maybe("isFinite", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(Number::from_value(v).map_or(Value::Null, |n| Value::Bool(n.as_f64().is_finite())))
        })
        .register_maybe("isNan", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(Number::from_value(v).map_or(Value::Null, |n| Value::Bool(n.as_f64().is_nan())))
        })
        .register_maybe("abs", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(match Number::from_value(v) {
                Some(Number::Int(i)) => i
                    .checked_abs()
                    .map_or_else(|| float((i as f64).abs()), Value::from),
                Some(Number::Float(f)) => float(f.abs()),
                None => Value::Null,
            })
        })
        .register_maybe("ceil", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(rounding(v, f64::ceil))
        })
        .register_maybe("floor", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(rounding(v, f64::floor))
        });

    real(registry, "exp", f64::exp);
    real(registry, "ln", f64::ln);
    real(registry, "log", f64::log10);
    real(registry, "lg", f64::log2);
    real(registry, "sqrt", f64::sqrt);
    real(registry, "sin", f64::sin);
    real(registry, "cos", f64::cos);
    real(registry, "tan", f64::tan);
    real(registry, "sinh", f64::sinh);
    real(registry, "cosh", f64::cosh);
    real(registry, "tanh", f64::tanh);
    real(registry, "erf", libm::erf);
}
