use crate::errors::{Error, Result};
use crate::literal::resolve_argument;
use crate::namespace;
use crate::registry::Registry;
use crate::tokenizer::tokenize;
use log::trace;
use serde_json::Value;

const WILDCARD: &str = "*";

/// evaluate runs a single pipeline expression against the source document.
///
/// The primary selector picks the starting value, then every `$` segment is applied left to
/// right. Arguments always resolve against `source`, never against the running value.
pub fn evaluate(
    registry: &Registry,
    source: &Value,
    expression: &str,
    location: &str,
) -> Result<Value> {
    if expression.is_empty() {
        return Ok(Value::Null);
    }
    if expression == WILDCARD {
        return Ok(source.clone());
    }

    let segments = tokenize(expression).map_err(|e| e.at(location))?;
    let (primary, operations) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(Value::Null),
    };

    let mut value = match primary.operation() {
        None | Some(WILDCARD) => source.clone(),
        Some(path) => namespace::extract(source, path),
    };
    trace!("{}: `{}` starts with {}", location, expression, value);

    for (n, segment) in operations.iter().enumerate() {
        let operation = match segment.operation() {
            Some(operation) => operation,
            None => {
                // segments[n] is the segment before this one
                let prior = segments[n].operation().unwrap_or("");
                return Err(Error::malformed(
                    format!("missing final operation after `{}`", prior),
                    location,
                ));
            }
        };
        let args: Vec<Value> = segment
            .arguments()
            .iter()
            .map(|token| resolve_argument(token, source))
            .collect();
        value = apply_operation(registry, value, operation, &args, location)?;
    }
    Ok(value)
}

/// apply_operation resolves an operation name, in order, as a registered function, an integer
/// index or a `.path` selector on the running value.
pub fn apply_operation(
    registry: &Registry,
    value: Value,
    operation: &str,
    args: &[Value],
    location: &str,
) -> Result<Value> {
    if let Some(function) = registry.lookup(operation) {
        trace!("{}: applying `{}` to {}", location, operation, value);
        return function
            .call(&value, args)
            .map_err(|e| e.within(operation, location));
    }

    if let Some(index) = parse_index(operation) {
        return Ok(index_into(value, index));
    }

    if let Some(path) = operation.strip_prefix('.') {
        if !args.is_empty() {
            return Err(Error::malformed(
                format!(
                    "selector `{}` takes no arguments (did you mean to do an operation?)",
                    operation
                ),
                location,
            ));
        }
        return Ok(namespace::extract(&value, path));
    }

    Err(Error::UnknownOperation {
        name: operation.to_owned(),
        location: location.to_owned(),
    })
}

/// only plain integers qualify, `1.5` or `1e3` are not indexes.
fn parse_index(operation: &str) -> Option<i64> {
    let digits = operation.strip_prefix('-').unwrap_or(operation);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    operation.parse().ok()
}

/// zero based indexing, negative indexes count from the end. Out of range is `null`.
fn index_into(value: Value, index: i64) -> Value {
    fn position(len: usize, index: i64) -> Option<usize> {
        let resolved = if index < 0 {
            len as i64 + index
        } else {
            index
        };
        if resolved >= 0 && (resolved as usize) < len {
            Some(resolved as usize)
        } else {
            None
        }
    }

    match value {
        Value::Array(mut arr) => match position(arr.len(), index) {
            Some(at) => arr.swap_remove(at),
            None => Value::Null,
        },
        Value::String(s) => {
            let count = s.chars().count();
            position(count, index)
                .and_then(|at| s.chars().nth(at))
                .map_or(Value::Null, |c| Value::String(c.to_string()))
        }
        _ => Value::Null,
    }
}
