//! Collaborators installed on every [`TransformerBuilder`](crate::transformer::TransformerBuilder)
//! by default.
//!
//! - `transform` (aliases `list`, `jtl_change`): the callback a record-mapping template uses to
//!   transform nested records, taking the nested template as its `template` (or `config_json`)
//!   parameter.
//! - `enumChange` (alias `enum_change`): the callback form of the `enumChange` operation, taking
//!   its lookup table as the `table` (or `enum_dict`) parameter.
//! - `enumFileChange path`: an operation looking the running value up in a JSON object stored in
//!   a file. Files are read once and kept for the life of the process.
use crate::errors::{Error, Result};
use crate::functions::arity;
use crate::functions::sequence::enum_lookup;
use crate::registry::{Invocation, Registry};
use crate::template::TransformSpec;
use crate::value;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type Table = Arc<Map<String, Value>>;

/// EnumFiles caches lookup tables by path. Entries are never invalidated.
#[derive(Debug, Clone, Default)]
pub struct EnumFiles {
    tables: Arc<Mutex<HashMap<PathBuf, Table>>>,
}

impl EnumFiles {
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let mut tables = self
            .tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(table) = tables.get(path) {
            return Ok(Arc::clone(table));
        }

        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            location: String::new(),
            source,
        })?;
        let table = match serde_json::from_str::<Value>(&contents)? {
            Value::Object(m) => Arc::new(m),
            other => {
                return Err(Error::invalid_arguments(format!(
                    "enum file {} must hold an object, found {}",
                    path.display(),
                    other
                )))
            }
        };
        debug!("loaded {} enum entries from {}", table.len(), path.display());
        tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// transforms `value` with the `template` parameter of the invocation. Arrays are transformed
/// element by element, nested arrays included.
fn transform_nested(value: Value, invocation: &Invocation) -> Result<Value> {
    let template = match first_param(invocation, &["template", "config_json"]) {
        Some(template) => TransformSpec::from_config(template.clone())?,
        None => {
            return Err(Error::malformed(
                "`transform` requires a `template` or `config_json` parameter",
                invocation.location,
            ))
        }
    };
    records(value, &template, invocation, invocation.location)
}

fn records(
    value: Value,
    template: &TransformSpec,
    invocation: &Invocation,
    location: &str,
) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(_) => invocation.transformer.transform(&value, template, location),
        Value::Array(arr) => arr
            .into_iter()
            .enumerate()
            .map(|(i, v)| records(v, template, invocation, &format!("{}.{}", location, i)))
            .collect::<Result<_>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

#[inline]
fn first_param<'a>(invocation: &Invocation<'a>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| invocation.param(name))
}

fn enum_change(value: Value, invocation: &Invocation) -> Result<Value> {
    match first_param(invocation, &["table", "enum_dict"]) {
        Some(table) if !value.is_null() => Ok(enum_lookup(&value, table)),
        Some(_) => Ok(Value::Null),
        None => Err(Error::malformed(
            "`enumChange` requires a `table` or `enum_dict` parameter",
            invocation.location,
        )),
    }
}

pub fn install(registry: &mut Registry) {
    install_with(registry, EnumFiles::default());
}

/// installs the collaborators sharing the given enum file cache.
pub fn install_with(registry: &mut Registry, files: EnumFiles) {
    registry
        .register_callback("transform", transform_nested)
        .register_callback("list", transform_nested)
        .register_callback("jtl_change", transform_nested)
        .register_callback("enumChange", enum_change)
        .register_callback("enum_change", enum_change)
        .register_maybe("enumFileChange", move |v: &Value, args: &[Value]| {
            arity(args, 1)?;
            let path = match &args[0] {
                Value::String(path) => path,
                other => {
                    return Err(Error::invalid_arguments(format!(
                        "expected a file path, found {}",
                        other
                    )))
                }
            };
            let table = files.load(path)?;
            Ok(table.get(&value::text(v)).cloned().unwrap_or(Value::Null))
        });
}
