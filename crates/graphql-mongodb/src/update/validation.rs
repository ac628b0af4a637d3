use indexmap::IndexSet;
use serde_json::Value;

use super::{overwrite_marker, OverwriteMode, OVERWRITE};
use crate::{
    graph::{CompositeId, Field, FieldType, TypeGraph},
    path::join_path,
    JsonMap, Result, ValidationErrors,
};

/// Checks that an update leaves no non-nullable field missing or null.
///
/// Presence is only asserted where the update replaces data: everywhere when `setOnInsert`
/// is given, from the root when `overwrite` is requested, and below any object whose
/// `_OVERWRITE` resolves to true. Explicit nulls are always rejected.
pub fn validate_update_args(
    graph: &TypeGraph,
    ty: CompositeId,
    update: &JsonMap,
    overwrite: bool,
    is_resolved_field: fn(&Field) -> bool,
) -> Result<()> {
    let objects = ["setOnInsert", "set"]
        .into_iter()
        .filter_map(|name| update.get(name).and_then(Value::as_object))
        .collect::<Vec<_>>();

    let mode = if update.get("setOnInsert").is_some_and(Value::is_object) {
        OverwriteMode::True
    } else {
        OverwriteMode::root(overwrite)
    };

    let mut validator = Validator {
        graph,
        is_resolved_field,
        errors: Vec::new(),
    };
    validator.validate_objects(&objects, ty, "", mode)?;

    if validator.errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(violations = validator.errors.len(), "Update arguments rejected");
        Err(ValidationErrors(validator.errors).into())
    }
}

struct Validator<'a> {
    graph: &'a TypeGraph,
    is_resolved_field: fn(&Field) -> bool,
    errors: Vec<String>,
}

impl Validator<'_> {
    fn validate_objects(&mut self, objects: &[&JsonMap], ty: CompositeId, path: &str, mode: OverwriteMode) -> Result<()> {
        let mut explicit = None;
        for object in objects {
            if let Some(marker) = overwrite_marker(object, path)? {
                explicit = Some(marker);
                break;
            }
        }
        let assert = mode.resolve(explicit);

        self.assert_non_nullable_fields(objects, ty, path, assert)?;
        self.traverse(objects, ty, path, OverwriteMode::inherited(assert))
    }

    fn assert_non_nullable_fields(
        &mut self,
        objects: &[&JsonMap],
        ty: CompositeId,
        path: &str,
        assert: bool,
    ) -> Result<()> {
        for field in self.graph.composite(ty)?.fields() {
            if !field.ty().is_non_null_type() || (path.is_empty() && field.name() == "_id") {
                continue;
            }

            let field_path = join_path(path, field.name());
            let values = objects
                .iter()
                .filter_map(|object| object.get(field.name()))
                .collect::<Vec<_>>();

            if let FieldType::NonNull(_) = field.ty() {
                if values.iter().any(|value| value.is_null()) {
                    self.errors
                        .push(format!("Non-nullable field \"{field_path}\" is set to null"));
                    continue;
                }
                if values.is_empty() && assert {
                    self.errors.push(format!("Missing non-nullable field \"{field_path}\""));
                    continue;
                }
            }

            if field.ty().is_list_type() && !non_null_elements(&values, field.ty()) {
                self.errors
                    .push(format!("Non-nullable element of array \"{field_path}\" is set to null"));
            }
        }

        Ok(())
    }

    fn traverse(&mut self, objects: &[&JsonMap], ty: CompositeId, path: &str, mode: OverwriteMode) -> Result<()> {
        let composite = self.graph.composite(ty)?;
        let keys = objects
            .iter()
            .flat_map(|object| object.keys())
            .filter(|key| *key != OVERWRITE)
            .collect::<IndexSet<_>>();

        for key in keys {
            let field = composite.field_or_err(key)?;
            let Some(nested) = field.ty().composite_id() else {
                continue;
            };
            if (self.is_resolved_field)(field) {
                continue;
            }

            let field_path = join_path(path, key);
            let values = objects
                .iter()
                .filter_map(|object| object.get(key))
                .filter(|value| !value.is_null())
                .collect::<Vec<_>>();

            if field.ty().is_list_type() {
                for element in list_elements(values, field.ty()) {
                    if let Value::Object(element) = element {
                        self.validate_objects(&[element], nested, &field_path, OverwriteMode::True)?;
                    }
                }
            } else {
                let values = values.into_iter().filter_map(Value::as_object).collect::<Vec<_>>();
                self.validate_objects(&values, nested, &field_path, mode)?;
            }
        }

        Ok(())
    }
}

/// Whether every element required to be non-null by `ty`, at any list depth, is.
fn non_null_elements(values: &[&Value], ty: &FieldType) -> bool {
    match ty {
        FieldType::NonNull(inner) => !values.iter().any(|value| value.is_null()) && non_null_elements(values, inner),
        FieldType::List(inner) => non_null_elements(&flatten(values), inner),
        _ => true,
    }
}

/// The non-null objects inside (possibly nested) lists.
fn list_elements<'a>(values: Vec<&'a Value>, ty: &FieldType) -> Vec<&'a Value> {
    match ty {
        FieldType::NonNull(inner) => list_elements(values, inner),
        FieldType::List(inner) => list_elements(
            flatten(&values).into_iter().filter(|value| !value.is_null()).collect(),
            inner,
        ),
        _ => values,
    }
}

fn flatten<'a>(values: &[&'a Value]) -> Vec<&'a Value> {
    values
        .iter()
        .flat_map(|value| match value {
            Value::Array(elements) => elements.iter().collect::<Vec<_>>(),
            Value::Null => Vec::new(),
            other => vec![*other],
        })
        .collect()
}
