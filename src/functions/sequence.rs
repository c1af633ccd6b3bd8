use super::arity;
use crate::registry::Registry;
use crate::value::{self, compare, equals, Number};
use serde_json::Value;
use std::cmp::Ordering;

#[inline]
fn chars(s: &str) -> Value {
    Value::Array(s.chars().map(|c| Value::String(c.to_string())).collect())
}

fn first(v: &Value, args: &[Value]) -> crate::errors::Result<Value> {
    arity(args, 0)?;
    Ok(match v {
        Value::Array(arr) => arr.first().cloned().unwrap_or(Value::Null),
        Value::String(s) => s
            .chars()
            .next()
            .map_or(Value::Null, |c| Value::String(c.to_string())),
        _ => Value::Null,
    })
}

fn last(v: &Value, args: &[Value]) -> crate::errors::Result<Value> {
    arity(args, 0)?;
    Ok(match v {
        Value::Array(arr) => arr.last().cloned().unwrap_or(Value::Null),
        Value::String(s) => s
            .chars()
            .last()
            .map_or(Value::Null, |c| Value::String(c.to_string())),
        _ => Value::Null,
    })
}

fn rm_first(v: &Value, args: &[Value]) -> crate::errors::Result<Value> {
    arity(args, 0)?;
    Ok(match v {
        Value::Array(arr) if !arr.is_empty() => Value::Array(arr[1..].to_vec()),
        Value::String(s) if !s.is_empty() => Value::String(s.chars().skip(1).collect()),
        Value::Null | Value::Array(_) | Value::String(_) => Value::Array(Vec::new()),
        _ => Value::Null,
    })
}

fn rm_last(v: &Value, args: &[Value]) -> crate::errors::Result<Value> {
    arity(args, 0)?;
    Ok(match v {
        Value::Array(arr) if !arr.is_empty() => Value::Array(arr[..arr.len() - 1].to_vec()),
        Value::String(s) if !s.is_empty() => {
            let mut s = s.clone();
            s.pop();
            Value::String(s)
        }
        Value::Null | Value::Array(_) | Value::String(_) => Value::Array(Vec::new()),
        _ => Value::Null,
    })
}

/// picks the extreme element, `None` on an empty or incomparable sequence.
fn extreme(arr: &[Value], wanted: Ordering) -> Option<Value> {
    let mut best = arr.first()?;
    for item in &arr[1..] {
        if compare(item, best)? == wanted {
            best = item;
        }
    }
    Some(best.clone())
}

fn sorted(v: &Value) -> Option<Value> {
    let mut items = match v {
        Value::Array(arr) => arr.clone(),
        Value::String(s) => match chars(s) {
            Value::Array(arr) => arr,
            _ => return None,
        },
        Value::Object(m) => m.keys().cloned().map(Value::String).collect(),
        _ => return None,
    };
    // all elements must be comparable with each other
    for pair in items.windows(2) {
        compare(&pair[0], &pair[1])?;
    }
    items.sort_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal));
    Some(Value::Array(items))
}

fn sum(arr: &[Value]) -> Option<Value> {
    let mut total = Number::Int(0);
    for item in arr {
        total = match (total, Number::from_value(item)?) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map_or(Number::Float(a as f64 + b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        };
    }
    Some(total.into_value())
}

fn unique(arr: &[Value]) -> Value {
    let mut seen: Vec<Value> = Vec::with_capacity(arr.len());
    for item in arr {
        if !seen.iter().any(|s| equals(s, item)) {
            seen.push(item.clone());
        }
    }
    Value::Array(seen)
}

/// looks the value's text up in a table given either as an object or as a string holding one.
pub(crate) fn enum_lookup(v: &Value, table: &Value) -> Value {
    let key = value::text(v);
    match table {
        Value::Object(m) => m.get(&key).cloned().unwrap_or(Value::Null),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(m)) => m.get(&key).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

pub(crate) fn install(registry: &mut Registry) {
    registry
        .register("first", first)
        .register("last", last)
        .register("rmFirst", rm_first)
        .register("rmLast", rm_last)
        .register("list", |_: &Value, args: &[Value]| Ok(Value::Array(args.to_vec())))
        .register("rmNull", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(match v {
                Value::Array(arr) => {
                    Value::Array(arr.iter().filter(|i| !i.is_null()).cloned().collect())
                }
                _ => Value::Null,
            })
        })
        .register_maybe("count", |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            Ok(match (v, &args[0]) {
                (Value::Array(arr), needle) => {
                    Value::from(arr.iter().filter(|i| equals(i, needle)).count())
                }
                (Value::String(s), Value::String(needle)) => {
                    Value::from(s.matches(needle.as_str()).count())
                }
                _ => Value::Null,
            })
        })
        .register_maybe("length", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(match v {
                Value::String(s) => Value::from(s.chars().count()),
                Value::Array(arr) => Value::from(arr.len()),
                Value::Object(m) => Value::from(m.len()),
                _ => Value::Null,
            })
        })
        .register_maybe("max", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_array()
                .and_then(|arr| extreme(arr, Ordering::Greater))
                .unwrap_or(Value::Null))
        })
        .register_maybe("min", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_array()
                .and_then(|arr| extreme(arr, Ordering::Less))
                .unwrap_or(Value::Null))
        })
        .register_maybe("sorted", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(sorted(v).unwrap_or(Value::Null))
        })
        .register_maybe("sum", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_array().and_then(|arr| sum(arr)).unwrap_or(Value::Null))
        })
        .register_maybe("unique", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(match v {
                Value::Array(arr) => unique(arr),
                Value::String(s) => match chars(s) {
                    Value::Array(arr) => unique(&arr),
                    _ => Value::Null,
                },
                _ => Value::Null,
            })
        })
        .register_maybe("keys", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_object().map_or(Value::Null, |m| {
                Value::Array(m.keys().cloned().map(Value::String).collect())
            }))
        })
        .register_maybe("values", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_object().map_or(Value::Null, |m| {
                Value::Array(m.values().cloned().collect())
            }))
        })
        .register_maybe("enumChange", |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            Ok(enum_lookup(v, &args[0]))
        });
}
