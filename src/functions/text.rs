use super::{arity, at_most};
use crate::errors::Result;
use crate::registry::Registry;
use crate::value;
use serde_json::Value;

/// registers a string to string operation without arguments.
fn unary<F>(registry: &mut Registry, name: &str, f: F)
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    registry.register_maybe(name, move |v: &Value, args: &[Value]| {
        arity(args, 0)?;
        Ok(v.as_str().map_or(Value::Null, |s| Value::String(f(s))))
    });
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn swap_case(s: &str) -> String {
    let mut swapped = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_lowercase() {
            swapped.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            swapped.extend(c.to_lowercase());
        } else {
            swapped.push(c);
        }
    }
    swapped
}

#[inline]
fn pieces(s: &str, sep: &str) -> Value {
    Value::Array(
        s.split(sep)
            .map(|piece| Value::String(piece.to_owned()))
            .collect(),
    )
}

/// joins an array made only of strings.
fn glue(v: &Value, sep: &str) -> Value {
    let arr = match v.as_array() {
        Some(arr) => arr,
        None => return Value::Null,
    };
    let parts: Option<Vec<&str>> = arr.iter().map(Value::as_str).collect();
    parts.map_or(Value::Null, |p| Value::String(p.join(sep)))
}

fn join(v: &Value, args: &[Value]) -> Result<Value> {
    at_most(args, 1)?;
    let sep = match args.first() {
        Some(Value::Null) | None => String::new(),
        Some(sep) => value::text(sep),
    };
    Ok(match v {
        Value::Array(arr) => Value::String(
            arr.iter()
                .filter(|item| !item.is_null())
                .map(value::text)
                .collect::<Vec<_>>()
                .join(sep.as_str()),
        ),
        _ => Value::Null,
    })
}

fn find(v: &Value, args: &[Value]) -> Result<Value> {
    arity(args, 1)?;
    Ok(match (v, &args[0]) {
        (Value::String(s), Value::String(needle)) => match s.find(needle.as_str()) {
            Some(at) => Value::from(s[..at].chars().count()),
            None => Value::from(-1),
        },
        _ => Value::Null,
    })
}

fn replace(v: &Value, args: &[Value]) -> Result<Value> {
    arity(args, 2)?;
    Ok(match (v, &args[0], &args[1]) {
        (Value::String(s), Value::String(from), Value::String(to)) => {
            Value::String(s.replace(from.as_str(), to))
        }
        _ => Value::Null,
    })
}

fn split(v: &Value, args: &[Value]) -> Result<Value> {
    arity(args, 1)?;
    Ok(match (v, &args[0]) {
        (Value::String(s), Value::String(sep)) if !sep.is_empty() => pieces(s, sep),
        _ => Value::Null,
    })
}

pub(crate) fn install(registry: &mut Registry) {
    registry.register("join", join);

    unary(registry, "lower", str::to_lowercase);
    unary(registry, "upper", str::to_uppercase);
    unary(registry, "capitalize", capitalize);
    unary(registry, "swapCase", swap_case);
    unary(registry, "strip", |s| s.trim().to_owned());
    unary(registry, "lstrip", |s| s.trim_start().to_owned());
    unary(registry, "rstrip", |s| s.trim_end().to_owned());

    registry
        .register_maybe("find", find)
        .register_maybe("replace", replace)
        .register_maybe("startsWith", |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            Ok(match (v, &args[0]) {
                (Value::String(s), Value::String(prefix)) => {
                    Value::Bool(s.starts_with(prefix.as_str()))
                }
                _ => Value::Null,
            })
        })
        .register_maybe("endsWith", |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            Ok(match (v, &args[0]) {
                (Value::String(s), Value::String(suffix)) => {
                    Value::Bool(s.ends_with(suffix.as_str()))
                }
                _ => Value::Null,
            })
        })
        .register_maybe("split", split)
        .register_maybe("lines", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_str().map_or(Value::Null, |s| pieces(s, "\n")))
        })
        .register_maybe("unlines", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(glue(v, "\n"))
        })
        .register_maybe("words", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(v.as_str().map_or(Value::Null, |s| pieces(s, " ")))
        })
        .register_maybe("unwords", |v: &Value, args: &[Value]| {
            arity(args, 0)?;
            Ok(glue(v, " "))
        });
}
