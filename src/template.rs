use crate::errors::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// key naming the source expression of a function call in the record-mapping configuration form.
pub const SOURCE_KEY: &str = "_source_col_name";
/// key naming the callback of a function call in the record-mapping configuration form.
pub const FUNCTION_KEY: &str = "_type_change";

/// TransformSpec is the template walked against the source document. Its shape mirrors the
/// output: mappings and sequences are rebuilt level by level, expressions are evaluated and
/// literals are copied through.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    Mapping(BTreeMap<String, TransformSpec>),
    Sequence(Vec<TransformSpec>),
    Expression(String),
    /// evaluates `expression` then hands the result to the callback registered as `function`.
    FunctionCall {
        expression: String,
        function: String,
        params: Map<String, Value>,
    },
    Literal(Value),
}

impl TransformSpec {
    #[inline]
    pub fn expression<S: Into<String>>(expression: S) -> Self {
        TransformSpec::Expression(expression.into())
    }

    /// a function call with parameters, which must be a JSON object.
    pub fn call<E, F>(expression: E, function: F, params: Value) -> Result<Self>
    where
        E: Into<String>,
        F: Into<String>,
    {
        let function = function.into();
        let params = match params {
            Value::Object(m) => m,
            other => {
                return Err(Error::malformed(
                    format!(
                        "parameters of `{}` must be an object, found {}",
                        function, other
                    ),
                    "",
                ))
            }
        };
        Ok(TransformSpec::FunctionCall {
            expression: expression.into(),
            function,
            params,
        })
    }

    /// a function call without parameters.
    pub fn call_with<E, F>(expression: E, function: F) -> Self
    where
        E: Into<String>,
        F: Into<String>,
    {
        TransformSpec::FunctionCall {
            expression: expression.into(),
            function: function.into(),
            params: Map::new(),
        }
    }

    /// parses a JSON template document.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Value>(input)?.into())
    }

    /// reads the record-mapping configuration form. Any object carrying both `_source_col_name`
    /// and `_type_change` becomes a function call whose parameters are the object's other keys,
    /// e.g.
    ///
    /// ```json
    /// {"skills": {"_source_col_name": "skills", "_type_change": "list", "template": {...}}}
    /// ```
    ///
    /// `list` is an alias of the `transform` callback. Everything else reads as [`From<Value>`].
    pub fn from_config(config: Value) -> Result<Self> {
        match config {
            Value::Object(mut map) => {
                if is_call(&map) {
                    let expression = take_string(&mut map, SOURCE_KEY)?;
                    let function = match take_string(&mut map, FUNCTION_KEY)?.as_str() {
                        "list" => String::from("transform"),
                        other => other.to_owned(),
                    };
                    return Ok(TransformSpec::FunctionCall {
                        expression,
                        function,
                        params: map,
                    });
                }
                map.into_iter()
                    .map(|(k, v)| Ok((k, Self::from_config(v)?)))
                    .collect::<Result<_>>()
                    .map(TransformSpec::Mapping)
            }
            Value::Array(arr) => arr
                .into_iter()
                .map(Self::from_config)
                .collect::<Result<_>>()
                .map(TransformSpec::Sequence),
            other => Ok(other.into()),
        }
    }
}

#[inline]
fn is_call(map: &Map<String, Value>) -> bool {
    let present = |key| map.get(key).map_or(false, |v| !v.is_null());
    present(SOURCE_KEY) && present(FUNCTION_KEY)
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Result<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Ok(s),
        other => Err(Error::malformed(
            format!("`{}` must be a string, found {:?}", key, other),
            "",
        )),
    }
}

impl From<Value> for TransformSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                TransformSpec::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::Array(arr) => TransformSpec::Sequence(arr.into_iter().map(Into::into).collect()),
            Value::String(s) => TransformSpec::Expression(s),
            other => TransformSpec::Literal(other),
        }
    }
}

impl<'a> From<&'a str> for TransformSpec {
    fn from(expression: &'a str) -> Self {
        TransformSpec::expression(expression)
    }
}
