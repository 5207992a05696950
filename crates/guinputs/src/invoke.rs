//! Invocation assembler.
//!
//! Turns the final main-window read plus the manual value store into the
//! positional and named arguments of the registered callable.

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::FormError;
use crate::form::{CompiledForm, FieldBinding};
use crate::store::ManualValueStore;
use crate::toolkit::Values;
use crate::value::{FromValue, Value};

/// Arguments handed to the registered callable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arguments {
    pub args: Vec<Value>,
    pub kwargs: IndexMap<String, Value>,
}

impl Arguments {
    pub fn positional<T: FromValue>(&self, index: usize) -> Result<T, FormError> {
        let name = format!("#{index}");
        let value = self
            .args
            .get(index)
            .ok_or_else(|| FormError::MissingValue(name.clone()))?;
        T::extract(&name, value)
    }

    pub fn named<T: FromValue>(&self, name: &str) -> Result<T, FormError> {
        let value = self
            .kwargs
            .get(name)
            .ok_or_else(|| FormError::MissingValue(name.to_string()))?;
        T::extract(name, value)
    }
}

/// Final value of one field.
///
/// Order of sources: widget read (when widget-backed and present), manual
/// store entry, parameter default (or an empty list for list parameters).
pub fn resolve(
    binding: &FieldBinding,
    values: &Values,
    store: &ManualValueStore,
) -> Result<Value, FormError> {
    let key = binding.key.as_str();
    if binding.is_widget_backed() {
        if let Some(raw) = values.get(key) {
            return binding.read(raw);
        }
    }
    store
        .get(key)
        .or_else(|| binding.fallback())
        .ok_or_else(|| FormError::MissingValue(binding.param.name.clone()))
}

pub fn assemble(
    form: &CompiledForm,
    values: &Values,
    store: &ManualValueStore,
) -> Result<Arguments, FormError> {
    let lookup = |key: &str| {
        form.binding(key)
            .ok_or_else(|| FormError::MissingValue(key.to_string()))
            .and_then(|binding| resolve(binding, values, store))
    };

    let args = form
        .arg_keys
        .iter()
        .map(|key| lookup(key.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let kwargs = form
        .kwarg_keys
        .iter()
        .map(|(key, name)| Ok((name.clone(), lookup(key.as_str())?)))
        .collect::<Result<IndexMap<_, _>, FormError>>()?;

    Ok(Arguments { args, kwargs })
}
