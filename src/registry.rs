//! The operation registry: names usable after `$` in an expression, plus the callback functions a
//! [`TransformSpec::FunctionCall`](crate::template::TransformSpec::FunctionCall) refers to by id.
//!
//! A registry is built once, extended by any collaborator modules and then only read. Entries are
//! shared `Arc`s so cloning a registry is cheap.
use crate::errors::Result;
use crate::functions;
use crate::transformer::Transformer;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Function is an operation applied to the running pipeline value with the segment's resolved
/// arguments.
pub trait Function: Send + Sync {
    fn call(&self, value: &Value, args: &[Value]) -> Result<Value>;
}

impl<F> Function for F
where
    F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync,
{
    #[inline]
    fn call(&self, value: &Value, args: &[Value]) -> Result<Value> {
        self(value, args)
    }
}

/// Maybe wraps a function with null propagation: when the running value or any argument is
/// `null` the call short-circuits to `null` without running the inner function.
#[derive(Debug, Clone, Copy)]
pub struct Maybe<F>(pub F);

impl<F> Function for Maybe<F>
where
    F: Function,
{
    #[inline]
    fn call(&self, value: &Value, args: &[Value]) -> Result<Value> {
        if value.is_null() || args.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }
        self.0.call(value, args)
    }
}

/// Invocation is what a callback gets to see besides the evaluated value.
pub struct Invocation<'a> {
    pub transformer: &'a Transformer,
    pub params: &'a Map<String, Value>,
    pub location: &'a str,
}

impl<'a> Invocation<'a> {
    #[inline]
    pub fn param(&self, name: &str) -> Option<&'a Value> {
        self.params.get(name)
    }
}

/// Callback is a host function invoked by a `FunctionCall` template node.
pub trait Callback: Send + Sync {
    fn call(&self, value: Value, invocation: &Invocation) -> Result<Value>;
}

impl<F> Callback for F
where
    F: Fn(Value, &Invocation) -> Result<Value> + Send + Sync,
{
    #[inline]
    fn call(&self, value: Value, invocation: &Invocation) -> Result<Value> {
        self(value, invocation)
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    functions: HashMap<String, Arc<dyn Function>>,
    callbacks: HashMap<String, Arc<dyn Callback>>,
}

impl Registry {
    /// an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// a registry holding the built-in operation catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        functions::install(&mut registry);
        registry
    }

    /// registers a function that handles `null` itself. Registering an existing name replaces it.
    pub fn register<S, F>(&mut self, name: S, function: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(function))
    }

    /// registers a function wrapped in [`Maybe`].
    pub fn register_maybe<S, F>(&mut self, name: S, function: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(Maybe(function)))
    }

    /// registers any [`Function`] implementation as is.
    pub fn insert<S>(&mut self, name: S, function: Arc<dyn Function>) -> &mut Self
    where
        S: Into<String>,
    {
        self.functions.insert(name.into(), function);
        self
    }

    pub fn register_callback<S, F>(&mut self, name: S, callback: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(Value, &Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
        self
    }

    /// define-and-register in one step while building a registry by value.
    pub fn with<S, F>(mut self, name: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(name, function);
        self
    }

    pub fn with_maybe<S, F>(mut self, name: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_maybe(name, function);
        self
    }

    pub fn with_callback<S, F>(mut self, name: S, callback: F) -> Self
    where
        S: Into<String>,
        F: Fn(Value, &Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_callback(name, callback);
        self
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    #[inline]
    pub fn callback(&self, name: &str) -> Option<&dyn Callback> {
        self.callbacks.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// registered operation names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut callbacks: Vec<&String> = self.callbacks.keys().collect();
        callbacks.sort_unstable();
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .field("callbacks", &callbacks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maybe_short_circuits() -> Result<()> {
        let registry = Registry::new()
            .with_maybe("boom", |_: &Value, _: &[Value]| panic!("must not run"))
            .with("count_args", |_: &Value, args: &[Value]| Ok(json!(args.len())));

        let boom = registry.lookup("boom").unwrap();
        assert_eq!(Value::Null, boom.call(&Value::Null, &[json!(1)])?);
        assert_eq!(Value::Null, boom.call(&json!(1), &[Value::Null])?);

        let count = registry.lookup("count_args").unwrap();
        assert_eq!(json!(2), count.call(&Value::Null, &[Value::Null, json!(1)])?);
        Ok(())
    }

    #[test]
    fn test_last_writer_wins() -> Result<()> {
        let mut registry = Registry::new();
        registry
            .register("answer", |_: &Value, _: &[Value]| Ok(json!(1)))
            .register("answer", |_: &Value, _: &[Value]| Ok(json!(42)));
        assert_eq!(
            json!(42),
            registry.lookup("answer").unwrap().call(&Value::Null, &[])?
        );
        Ok(())
    }

    #[test]
    fn test_case_sensitive() {
        let registry = Registry::builtin();
        assert!(registry.contains("toString"));
        assert!(!registry.contains("tostring"));
        assert!(registry.lookup("TOSTRING").is_none());
    }

    #[test]
    fn test_catalog() {
        let registry = Registry::builtin();
        for name in &[
            "toString", "toBool", "toFloat", "toInt", "toNumber", "and", "or", "not", "isNull",
            "default", "defaultNan", "first", "last", "rmFirst", "rmLast", "list", "rmNull",
            "count", "length", "max", "min", "sorted", "sum", "unique", "join", "lower", "upper",
            "capitalize", "swapCase", "strip", "lstrip", "rstrip", "find", "replace",
            "startsWith", "endsWith", "split", "lines", "unlines", "words", "unwords", "keys",
            "values", "enumChange", "+", "-", "*", "/", "**", "%", "==", "!=", "<", "<=", ">",
            ">=", "isFinite", "isNan", "abs", "ceil", "floor", "exp", "ln", "log", "lg", "sqrt",
            "sin", "cos", "tan", "sinh", "cosh", "tanh", "erf", "md5", "sha1", "sha224",
            "sha256", "sha384", "sha512", "hmac_md5", "hmac_sha1", "hmac_sha224",
            "hmac_sha256", "hmac_sha384", "hmac_sha512",
        ] {
            assert!(registry.contains(name), "missing `{}`", name);
        }
    }
}
