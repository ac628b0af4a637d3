//! Compiles filter arguments into MongoDB filter documents.
//!
//! Nested object fields are flattened into dot paths, list fields are matched through
//! `$elemMatch`, and the `OR`/`AND`/`NOR` combinators become `$or`/`$and`/`$nor`.

mod leaf;
mod legacy;
mod operators;

use serde_json::Value;

pub use operators::{ExistsOperator, LeafOperator, LegacyOperator};

use crate::{
    graph::{CompositeId, TypeGraph},
    path::join_path,
    Error, JsonMap, Result,
};

pub(crate) const COMBINATORS: [(&str, &str); 3] = [("OR", "$or"), ("AND", "$and"), ("NOR", "$nor")];

const EXISTS_FIELD: &str = "opr";

/// Compiles the `filter` argument of a query against `ty`. A missing or null filter matches
/// everything.
pub fn compile_filter(graph: &TypeGraph, ty: CompositeId, filter: Option<&Value>) -> Result<JsonMap> {
    let document = match filter {
        None | Some(Value::Null) => JsonMap::new(),
        Some(Value::Object(filter)) => compile_filter_object(graph, ty, filter)?,
        Some(_) => return Err(Error::invalid_argument("", "the filter must be an object")),
    };

    tracing::trace!(keys = document.len(), "Compiled filter");

    Ok(document)
}

fn compile_filter_object(graph: &TypeGraph, ty: CompositeId, filter: &JsonMap) -> Result<JsonMap> {
    let mut document = compile_fields(graph, ty, filter, "", false)?;

    for (combinator, native) in COMBINATORS {
        let filters = match filter.get(combinator) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(filters)) => filters,
            Some(_) => return Err(Error::invalid_argument(combinator, "expected a list of filters")),
        };

        if filters.is_empty() {
            continue;
        }

        let compiled = filters
            .iter()
            .map(|filter| match filter {
                Value::Object(filter) => compile_filter_object(graph, ty, filter).map(Value::Object),
                _ => Err(Error::invalid_argument(combinator, "expected a list of filters")),
            })
            .collect::<Result<Vec<_>>>()?;

        document.insert(native.to_string(), Value::Array(compiled));
    }

    Ok(document)
}

/// Walks the filter in lock-step with the fields of `ty`, writing keys relative to `path`.
///
/// The root level carries the combinators, nested object levels carry `opr`. Anywhere else
/// those keys name stored fields.
fn compile_fields(
    graph: &TypeGraph,
    ty: CompositeId,
    filter: &JsonMap,
    path: &str,
    nested_level: bool,
) -> Result<JsonMap> {
    let composite = graph.composite(ty)?;
    let mut document = JsonMap::new();

    for (key, value) in filter {
        let reserved = if nested_level {
            key == EXISTS_FIELD
        } else {
            COMBINATORS.iter().any(|(combinator, _)| combinator == key)
        };
        if reserved {
            continue;
        }

        let field = composite.field_or_err(key)?;
        let field_path = join_path(path, key);

        let field_filter = match value {
            Value::Null => continue,
            Value::Object(field_filter) => field_filter,
            _ => return Err(Error::invalid_argument(&field_path, "expected an object")),
        };

        let Some(nested) = field.ty().composite_id() else {
            let compiled = leaf::compile_leaf(field_filter, &field_path, graph.diagnostics())?;
            if !compiled.is_empty() {
                document.insert(field_path, Value::Object(compiled));
            }
            continue;
        };

        let exists = exists_filter(field_filter, &field_path)?;

        if field.ty().is_list_type() {
            let mut element = JsonMap::new();
            if let Some(exists) = exists {
                element.insert("$exists".to_string(), Value::Bool(exists));
            }
            element.extend(compile_fields(graph, nested, field_filter, "", true)?);

            if !element.is_empty() {
                let mut condition = JsonMap::new();
                condition.insert("$elemMatch".to_string(), Value::Object(element));
                document.insert(field_path, Value::Object(condition));
            }
        } else {
            if let Some(exists) = exists {
                let mut condition = JsonMap::new();
                condition.insert("$exists".to_string(), Value::Bool(exists));
                document.insert(field_path.clone(), Value::Object(condition));
            }
            document.extend(compile_fields(graph, nested, field_filter, &field_path, true)?);
        }
    }

    Ok(document)
}

fn exists_filter(filter: &JsonMap, path: &str) -> Result<Option<bool>> {
    match filter.get(EXISTS_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(operator)) => ExistsOperator::parse(operator)
            .map(|operator| Some(operator == ExistsOperator::Exists))
            .ok_or_else(|| Error::invalid_argument(path, format!("unknown opr value {operator}"))),
        Some(_) => Err(Error::invalid_argument(path, "opr must be a string")),
    }
}
