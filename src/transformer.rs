use crate::errors::{Error, Result};
use crate::evaluator;
use crate::extensions;
use crate::registry::{Invocation, Registry};
use crate::template::TransformSpec;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Mode defines the Transformers behaviour when encountering multiple element top level data such as
/// Array's. The default, Many2Many, applies the template to every element of a top level array and
/// returns an array of results; `* $ length` then measures each element, not the array. One2One
/// hands the whole array to the template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Mode {
    One2One,
    Many2Many, // does One2One when input is NOT an array
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Many2Many
    }
}

/// TransformerBuilder is used to construct a new Transformer. It starts out with the built-in
/// operation catalog and the default extensions. Once a Transformer is built it is immutable.
#[derive(Debug)]
pub struct TransformerBuilder {
    registry: Registry,
    mode: Mode,
}

impl Default for TransformerBuilder {
    fn default() -> Self {
        let mut registry = Registry::builtin();
        extensions::install(&mut registry);
        TransformerBuilder {
            registry,
            mode: Mode::default(),
        }
    }
}

impl TransformerBuilder {
    /// sets the mode for which the Transformer will operate.
    #[inline]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// adds a custom operation, replacing any existing one of the same name.
    #[inline]
    pub fn register<S, F>(mut self, name: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register(name, function);
        self
    }

    /// adds a custom operation that is skipped whenever its input or an argument is `null`.
    #[inline]
    pub fn register_maybe<S, F>(mut self, name: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_maybe(name, function);
        self
    }

    /// adds a callback which function call templates can refer to by name.
    #[inline]
    pub fn register_callback<S, F>(mut self, name: S, callback: F) -> Self
    where
        S: Into<String>,
        F: Fn(Value, &Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_callback(name, callback);
        self
    }

    /// lets a collaborator module install whatever it needs.
    #[inline]
    pub fn extend<F>(mut self, install: F) -> Self
    where
        F: FnOnce(&mut Registry),
    {
        install(&mut self.registry);
        self
    }

    /// replaces the registry entirely.
    #[inline]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<Transformer> {
        debug!(
            "building {:?} transformer with {} operations",
            self.mode,
            self.registry.names().len()
        );
        Ok(Transformer {
            registry: self.registry,
            mode: self.mode,
        })
    }
}

/// Transformer is used to apply a template to any Serializable data.
#[derive(Debug, Clone)]
pub struct Transformer {
    registry: Registry,
    mode: Mode,
}

impl Transformer {
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// evaluates a single pipeline expression against `source`.
    #[inline]
    pub fn evaluate(&self, source: &Value, expression: &str) -> Result<Value> {
        evaluator::evaluate(&self.registry, source, expression, "")
    }

    /// walks `template` against `source`, `location` being the breadcrumb reported in errors.
    /// Neither input is modified; every mapping and sequence in the result is freshly built.
    pub fn transform(
        &self,
        source: &Value,
        template: &TransformSpec,
        location: &str,
    ) -> Result<Value> {
        match template {
            TransformSpec::Mapping(fields) => {
                let mut results = Map::new();
                for (key, spec) in fields {
                    let value = self.transform(source, spec, &format!("{}.{}", location, key))?;
                    results.insert(key.clone(), value);
                }
                Ok(Value::Object(results))
            }
            TransformSpec::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, spec)| self.transform(source, spec, &format!("{}.{}", location, i)))
                .collect::<Result<_>>()
                .map(Value::Array),
            TransformSpec::Expression(expression) => {
                evaluator::evaluate(&self.registry, source, expression, location)
            }
            TransformSpec::FunctionCall {
                expression,
                function,
                params,
            } => {
                let callback = self.registry.callback(function).ok_or_else(|| {
                    Error::UnknownFunction {
                        name: function.clone(),
                        location: location.to_owned(),
                    }
                })?;
                let value = evaluator::evaluate(&self.registry, source, expression, location)?;
                let invocation = Invocation {
                    transformer: self,
                    params,
                    location,
                };
                callback.call(value, &invocation).map_err(|e| e.at(location))
            }
            TransformSpec::Literal(value) => Ok(value.clone()),
        }
    }

    /// applies the template to the source document, one record at a time for arrays in
    /// Many2Many mode.
    pub fn apply(&self, template: &TransformSpec, source: &Value) -> Result<Value> {
        match source {
            Value::Array(records) if self.mode == Mode::Many2Many => records
                .iter()
                .map(|record| self.transform(record, template, ""))
                .collect::<Result<_>>()
                .map(Value::Array),
            _ => self.transform(source, template, ""),
        }
    }

    /// applies the template to JSON within a string.
    #[inline]
    pub fn apply_from_str<'a, S>(&self, template: &TransformSpec, input: S) -> Result<Value>
    where
        S: Into<Cow<'a, str>>,
    {
        self.apply(template, &serde_json::from_str(&input.into())?)
    }

    /// applies the template to any serializable data and returns your desired structure.
    #[inline]
    pub fn apply_to<S, D>(&self, template: &TransformSpec, input: S) -> Result<D>
    where
        S: Serialize,
        D: DeserializeOwned,
    {
        let results = self.apply(template, &serde_json::to_value(input)?)?;
        Ok(serde_json::from_value::<D>(results)?)
    }
}
