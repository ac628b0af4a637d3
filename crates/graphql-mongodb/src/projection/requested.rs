use std::collections::{HashMap, HashSet};

use async_graphql_parser::{
    types::{ExecutableDocument, Field as SelectedField, FragmentDefinition, Selection, SelectionSet},
    Positioned,
};
use async_graphql_value::Name;
use indexmap::IndexMap;

use crate::{
    graph::{CompositeId, Field, TypeGraph},
    Result,
};

/// The selection of the field being resolved: the field nodes sharing its response key and
/// the fragments of the operation they belong to.
#[derive(Debug, Clone)]
pub struct ResolveInfo<'a> {
    pub field_nodes: Vec<&'a Positioned<SelectedField>>,
    pub fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
}

impl<'a> ResolveInfo<'a> {
    pub fn new(
        field_nodes: Vec<&'a Positioned<SelectedField>>,
        fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    ) -> Self {
        ResolveInfo { field_nodes, fragments }
    }

    /// Collects the root fields answering to `response_key` across every operation of the
    /// document.
    pub fn from_document(document: &'a ExecutableDocument, response_key: &str) -> Self {
        let field_nodes = document
            .operations
            .iter()
            .flat_map(|(_, operation)| operation.node.selection_set.node.items.iter())
            .filter_map(|selection| match &selection.node {
                Selection::Field(field) if field.node.response_key().node.as_str() == response_key => Some(field),
                _ => None,
            })
            .collect();

        ResolveInfo::new(field_nodes, &document.fragments)
    }
}

/// A field selected in the request.
#[derive(Debug, Clone)]
pub struct Requested<'g> {
    pub field: &'g Field,
    /// `None` when the field is selected as a leaf.
    pub selection: Option<RequestedFields<'g>>,
}

/// The requested selection flattened into a presence tree, with fragments resolved.
#[derive(Debug, Clone, Default)]
pub struct RequestedFields<'g> {
    fields: IndexMap<&'g str, Requested<'g>>,
}

impl<'g> RequestedFields<'g> {
    pub fn get(&self, name: &str) -> Option<&Requested<'g>> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requested<'g>> + '_ {
        self.fields.values()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, field: &'g Field, selection: Option<RequestedFields<'g>>) {
        match self.fields.get_mut(field.name()) {
            None => {
                self.fields.insert(field.name(), Requested { field, selection });
            }
            Some(existing) => match (&mut existing.selection, selection) {
                (Some(current), Some(other)) => current.merge(other),
                // A leaf selection covers the whole field.
                (current, _) => *current = None,
            },
        }
    }

    fn merge(&mut self, other: RequestedFields<'g>) {
        for (_, requested) in other.fields {
            self.insert(requested.field, requested.selection);
        }
    }
}

/// Flattens the selection of `info` against the fields of `ty`.
pub fn requested_fields<'g>(graph: &'g TypeGraph, ty: CompositeId, info: &ResolveInfo<'_>) -> Result<RequestedFields<'g>> {
    let mut collector = Collector {
        graph,
        fragments: info.fragments,
        memo: HashMap::new(),
        in_progress: HashSet::new(),
    };

    let mut requested = RequestedFields::default();
    for node in info.field_nodes.iter().copied() {
        let selection = collector.collect(&node.node.selection_set.node, ty)?;
        requested.merge(selection);
    }

    Ok(requested)
}

struct Collector<'g, 'a> {
    graph: &'g TypeGraph,
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    memo: HashMap<(&'a str, CompositeId), RequestedFields<'g>>,
    in_progress: HashSet<&'a str>,
}

impl<'g, 'a> Collector<'g, 'a> {
    fn collect(&mut self, selection_set: &'a SelectionSet, ty: CompositeId) -> Result<RequestedFields<'g>> {
        let composite = self.graph.composite(ty)?;
        let mut requested = RequestedFields::default();

        for selection in &selection_set.items {
            match &selection.node {
                Selection::Field(selected) => {
                    let name = selected.node.name.node.as_str();
                    if name.starts_with("__") {
                        continue;
                    }

                    let field = composite.field_or_err(name)?;
                    let items = &selected.node.selection_set.node;

                    let nested = match field.ty().composite_id() {
                        Some(nested) if !items.items.is_empty() => Some(self.collect(items, nested)?),
                        _ => None,
                    };
                    requested.insert(field, nested);
                }
                Selection::InlineFragment(fragment) => {
                    let target = fragment
                        .node
                        .type_condition
                        .as_ref()
                        .and_then(|condition| self.graph.composite_by_name(&condition.node.on.node))
                        .unwrap_or(ty);
                    requested.merge(self.collect(&fragment.node.selection_set.node, target)?);
                }
                Selection::FragmentSpread(spread) => {
                    requested.merge(self.fragment(&spread.node.fragment_name.node, ty)?);
                }
            }
        }

        Ok(requested)
    }

    fn fragment(&mut self, name: &str, ty: CompositeId) -> Result<RequestedFields<'g>> {
        let Some((name, definition)) = self.fragments.get_key_value(name) else {
            tracing::debug!("Fragment {name} is not defined, ignoring its spread");
            return Ok(RequestedFields::default());
        };
        let name = name.as_str();

        let target = self
            .graph
            .composite_by_name(&definition.node.type_condition.node.on.node)
            .unwrap_or(ty);

        if let Some(requested) = self.memo.get(&(name, target)) {
            return Ok(requested.clone());
        }
        // Cyclic spreads are rejected by query validation; stop rather than loop.
        if !self.in_progress.insert(name) {
            return Ok(RequestedFields::default());
        }

        let requested = self.collect(&definition.node.selection_set.node, target)?;
        self.in_progress.remove(name);
        self.memo.insert((name, target), requested.clone());

        Ok(requested)
    }
}
