use crate::errors::{Error, Result};
use log::debug;
use serde_json::Value;
use std::borrow::Cow;

/// represents a single level of a dotted path used to extract values from JSON structures.
///
/// # Example
/// `test.value` would be represented by two Namespace Object's `test` and `value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Namespace {
    Object { id: String },
    Array { id: String, index: usize },
}

impl Namespace {
    /// parse takes an ordinary namespaced string eg. `object.nested[0][1].nested.field` and
    /// turns it into the levels walked by [`extract`].
    ///
    /// **NOTE:** a bare numeric level such as `list.1` is still an Object level; it only becomes
    ///       an index when the value it is applied to turns out to be an array.
    pub fn parse<'a, S>(input: S) -> Result<Vec<Namespace>>
    where
        S: Into<Cow<'a, str>>,
    {
        input
            .into()
            .split('.')
            .flat_map(|s| s.split_terminator(']'))
            .map(|v| {
                if let Some(idx) = v.find('[') {
                    let index = v[idx + 1..].parse().map_err(|_| {
                        Error::InvalidNamespace(format!("`{}` is not a valid array index", v))
                    })?;
                    Ok(Namespace::Array {
                        id: v[..idx].to_string(),
                        index,
                    })
                } else {
                    Ok(Namespace::Object { id: v.to_string() })
                }
            })
            .collect()
    }
}

/// extract resolves a dotted path against a value, returning `null` when any level is absent.
/// The empty path is the value itself.
pub fn extract(value: &Value, path: &str) -> Value {
    if path.is_empty() {
        return value.clone();
    }
    match Namespace::parse(path) {
        Ok(namespace) => lookup(value, &namespace).cloned().unwrap_or(Value::Null),
        Err(e) => {
            debug!("treating path `{}` as absent: {}", path, e);
            Value::Null
        }
    }
}

pub(crate) fn lookup<'v>(mut current: &'v Value, namespace: &[Namespace]) -> Option<&'v Value> {
    for ns in namespace {
        current = match ns {
            Namespace::Object { id } => step(current, id)?,
            Namespace::Array { id, index } => {
                // may be array of array already without id eg. arr[0][0]
                let arr = if id.is_empty() {
                    current
                } else {
                    step(current, id)?
                };
                arr.as_array()?.get(*index)?
            }
        };
    }
    Some(current)
}

#[inline]
fn step<'v>(value: &'v Value, id: &str) -> Option<&'v Value> {
    match value {
        Value::Object(m) => m.get(id),
        Value::Array(arr) => arr.get(id.parse::<usize>().ok()?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace() {
        let ns = "embedded.array[0][1]";
        let results = Namespace::parse(ns).unwrap();
        let expected = vec![
            Namespace::Object {
                id: String::from("embedded"),
            },
            Namespace::Array {
                id: String::from("array"),
                index: 0,
            },
            Namespace::Array {
                id: String::from(""),
                index: 1,
            },
        ];
        assert_eq!(expected, results);
    }

    #[test]
    fn test_bad_index() {
        assert!(Namespace::parse("list[x]").is_err());
    }

    #[test]
    fn test_extract() {
        let data = json!({
            "a": {"X": 3, "Y": 2},
            "b": {"p": {"d": {"q": "test"}}},
            "list": ["aa", "bb", {"deep": true}],
            "grid": [[1, 2], [3, 4]]
        });
        assert_eq!(json!(3), extract(&data, "a.X"));
        assert_eq!(json!("test"), extract(&data, "b.p.d.q"));
        assert_eq!(json!("bb"), extract(&data, "list.1"));
        assert_eq!(json!(true), extract(&data, "list.2.deep"));
        assert_eq!(json!(4), extract(&data, "grid[1][1]"));
        assert_eq!(Value::Null, extract(&data, "a.Z"));
        assert_eq!(Value::Null, extract(&data, "a.X.deeper"));
        assert_eq!(Value::Null, extract(&data, "list.9"));
        assert_eq!(Value::Null, extract(&data, "list[x]"));
        assert_eq!(data, extract(&data, ""));
    }
}
