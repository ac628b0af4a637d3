//! Compiles update arguments into `$set`/`$setOnInsert`/`$inc` documents.

mod inc;
mod set;
mod validation;

use serde_json::Value;

pub use validation::validate_update_args;

use crate::{Error, JsonMap, Result};

/// Marker of set objects: when true the object replaces the stored sub-document.
pub const OVERWRITE: &str = "_OVERWRITE";

/// Placeholder field of inc types that would otherwise have no field.
pub const FICTIVE_INC: &str = "_FICTIVE_INC";

/// Whether set objects replace (`True`) or merge into (`False`) the stored sub-documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Root of an operation that overwrites unless the payload says otherwise.
    DefaultTrueRoot,
    /// Forced on, for this object and all its descendants.
    True,
    False,
}

impl OverwriteMode {
    pub fn root(overwrite: bool) -> OverwriteMode {
        if overwrite {
            OverwriteMode::DefaultTrueRoot
        } else {
            OverwriteMode::False
        }
    }

    /// Effective mode of an object given its own `_OVERWRITE` value.
    pub fn resolve(self, explicit: Option<bool>) -> bool {
        match (self, explicit) {
            (OverwriteMode::True, _) => true,
            (_, Some(explicit)) => explicit,
            (OverwriteMode::DefaultTrueRoot, None) => true,
            (OverwriteMode::False, None) => false,
        }
    }

    /// The mode children inherit once this level resolved to `overwrite`.
    pub(crate) fn inherited(overwrite: bool) -> OverwriteMode {
        if overwrite {
            OverwriteMode::True
        } else {
            OverwriteMode::False
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct UpdateOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub upsert: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct CompiledUpdate {
    pub update: JsonMap,
    pub options: UpdateOptions,
}

/// Compiles the `update` argument. `overwrite` seeds the overwrite cascade of `set`.
pub fn compile_update(update: &JsonMap, overwrite: bool) -> Result<CompiledUpdate> {
    let mut compiled = CompiledUpdate::default();

    if let Some(set_on_insert) = object_argument(update, "setOnInsert")? {
        compiled
            .update
            .insert("$setOnInsert".to_string(), Value::Object(set_on_insert.clone()));
        compiled.options.upsert = true;
    }

    if let Some(set) = object_argument(update, "set")? {
        let set = set::compile_set(set, OverwriteMode::root(overwrite), "set")?;
        if !set.is_empty() {
            compiled.update.insert("$set".to_string(), Value::Object(set));
        }
    }

    if let Some(inc) = object_argument(update, "inc")? {
        let inc = inc::compile_inc(inc)?;
        if !inc.is_empty() {
            compiled.update.insert("$inc".to_string(), Value::Object(inc));
        }
    }

    tracing::trace!(operators = compiled.update.len(), upsert = compiled.options.upsert, "Compiled update");

    Ok(compiled)
}

fn object_argument<'a>(arguments: &'a JsonMap, name: &str) -> Result<Option<&'a JsonMap>> {
    match arguments.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(_) => Err(Error::invalid_argument(name, "expected an object")),
    }
}

/// The `_OVERWRITE` value of a set object, if it carries one.
pub(crate) fn overwrite_marker(object: &JsonMap, path: &str) -> Result<Option<bool>> {
    match object.get(OVERWRITE) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(overwrite)) => Ok(Some(*overwrite)),
        Some(_) => Err(Error::invalid_argument(path, "_OVERWRITE must be a boolean")),
    }
}
