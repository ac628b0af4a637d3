use std::fmt;

use serde::Deserialize;

use crate::graph::Field;

/// Tells which fields are produced by custom logic rather than read from the document.
#[derive(Clone, Copy)]
pub struct ResolvedFieldPredicate(pub fn(&Field) -> bool);

impl ResolvedFieldPredicate {
    pub fn get(self) -> fn(&Field) -> bool {
        self.0
    }
}

impl Default for ResolvedFieldPredicate {
    fn default() -> Self {
        ResolvedFieldPredicate(Field::is_computed)
    }
}

impl fmt::Debug for ResolvedFieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResolvedFieldPredicate(..)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// The field returns something other than the documents of its type, so no projection.
    pub different_output_type: bool,
    pub excluded_fields: Vec<String>,
    #[serde(skip)]
    pub is_resolved_field: ResolvedFieldPredicate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateResolverOptions {
    pub different_output_type: bool,
    /// Rejects updates leaving non-nullable fields missing or null before the store is called.
    pub validate_update_args: bool,
    /// Set objects replace the stored sub-documents unless they opt out with `_OVERWRITE`.
    pub overwrite: bool,
    pub excluded_fields: Vec<String>,
    #[serde(skip)]
    pub is_resolved_field: ResolvedFieldPredicate,
}

impl QueryOptions {
    #[must_use]
    pub fn with_resolved_field(mut self, predicate: fn(&Field) -> bool) -> Self {
        self.is_resolved_field = ResolvedFieldPredicate(predicate);
        self
    }
}

impl UpdateResolverOptions {
    #[must_use]
    pub fn with_resolved_field(mut self, predicate: fn(&Field) -> bool) -> Self {
        self.is_resolved_field = ResolvedFieldPredicate(predicate);
        self
    }
}

pub(super) fn excluded(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}
