//! Compiles the requested selection into a MongoDB projection.
//!
//! Stored fields are projected by path. Computed fields are replaced by the document paths
//! they declare as dependencies, and keys already covered by a broader key are pruned.

mod requested;

use indexmap::IndexSet;
use serde_json::Value;

pub use requested::{requested_fields, Requested, RequestedFields, ResolveInfo};

use crate::{
    diagnostics::Diagnostic,
    graph::{CompositeId, Field, TypeGraph},
    path::{is_sub_path, join_path},
    JsonMap, Result,
};

/// Projection `{ "dot.path": 1 }` of the fields `info` selects on `ty`.
///
/// `excluded` root fields are never projected. Fields accepted by `is_resolved_field` are
/// computed and contribute their dependencies instead of themselves.
pub fn compile_projection(
    graph: &TypeGraph,
    ty: CompositeId,
    info: &ResolveInfo<'_>,
    excluded: &[&str],
    is_resolved_field: fn(&Field) -> bool,
) -> Result<JsonMap> {
    let requested = requested_fields(graph, ty, info)?;

    let mut projection = IndexSet::new();
    collect_projection(&requested, "", excluded, is_resolved_field, &mut projection);

    let mut dependencies = IndexSet::new();
    collect_dependencies(&requested, "", is_resolved_field, &mut dependencies);

    warn_unsafe_selections(graph, ty, &requested, is_resolved_field)?;

    let projection = merge_projection_and_dependencies(projection, dependencies);
    let projection = omit_redundant_projection(projection);

    tracing::trace!(keys = projection.len(), "Compiled projection");

    Ok(projection.into_iter().map(|path| (path, Value::from(1))).collect())
}

fn collect_projection(
    requested: &RequestedFields<'_>,
    path: &str,
    excluded: &[&str],
    is_resolved_field: fn(&Field) -> bool,
    projection: &mut IndexSet<String>,
) {
    for Requested { field, selection } in requested.iter() {
        if (path.is_empty() && excluded.contains(&field.name())) || is_resolved_field(field) {
            continue;
        }

        let field_path = join_path(path, field.name());
        match selection {
            Some(nested) if !nested.is_empty() => {
                collect_projection(nested, &field_path, &[], is_resolved_field, projection);
            }
            _ => {
                projection.insert(field_path);
            }
        }
    }
}

/// Declared dependencies of every selected computed field, prefixed with the path of the
/// object holding it.
fn collect_dependencies(
    requested: &RequestedFields<'_>,
    path: &str,
    is_resolved_field: fn(&Field) -> bool,
    dependencies: &mut IndexSet<String>,
) {
    for Requested { field, selection } in requested.iter() {
        if is_resolved_field(field) {
            dependencies.extend(field.dependencies().iter().map(|dependency| join_path(path, dependency)));
        } else if let Some(nested) = selection {
            collect_dependencies(nested, &join_path(path, field.name()), is_resolved_field, dependencies);
        }
    }
}

fn merge_projection_and_dependencies(
    mut projection: IndexSet<String>,
    dependencies: IndexSet<String>,
) -> IndexSet<String> {
    for dependency in dependencies {
        let covered = projection
            .iter()
            .any(|key| *key == dependency || is_sub_path(&dependency, key));
        if covered {
            continue;
        }

        projection.retain(|key| !is_sub_path(key, &dependency));
        projection.insert(dependency);
    }

    projection
}

fn omit_redundant_projection(projection: IndexSet<String>) -> IndexSet<String> {
    projection
        .iter()
        .filter(|key| !projection.iter().any(|other| is_sub_path(key, other)))
        .cloned()
        .collect()
}

/// Selected computed fields without dependencies may read anything from the document.
fn warn_unsafe_selections(
    graph: &TypeGraph,
    ty: CompositeId,
    requested: &RequestedFields<'_>,
    is_resolved_field: fn(&Field) -> bool,
) -> Result<()> {
    let fields = requested
        .iter()
        .filter(|requested| is_resolved_field(requested.field) && requested.field.is_unsafe())
        .map(|requested| requested.field.name().to_string())
        .collect::<Vec<_>>();

    if !fields.is_empty() {
        graph.diagnostics().warn_once(Diagnostic::UnsafeComputedFields {
            ty: graph.composite(ty)?.name().to_string(),
            fields,
        });
    }

    for requested in requested.iter() {
        if is_resolved_field(requested.field) {
            continue;
        }
        if let (Some(nested), Some(nested_ty)) = (&requested.selection, requested.field.ty().composite_id()) {
            warn_unsafe_selections(graph, nested_ty, nested, is_resolved_field)?;
        }
    }

    Ok(())
}
