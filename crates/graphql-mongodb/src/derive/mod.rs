//! Derives the filter, sort, insert, update and pagination input types of a type graph.
//!
//! Every derived type is registered under its name the first time it is requested and shared
//! afterwards. The entry is registered before its fields are derived, so a field leading back
//! to a type under construction refers to that same entry.

mod args;
mod filter;
mod mutation;
mod pagination;
mod sort;

use itertools::Itertools;

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    graph::{CompositeId, EnumId, FieldType, NamedType, TypeGraph},
    registry::{EnumType, InputObjectType, InputValueType, MetaEnumValue, MetaType, Registry},
    Result,
};

/// Owns the derived types of one schema build.
#[derive(Debug)]
pub struct DerivationContext<'g> {
    graph: &'g TypeGraph,
    registry: Registry,
    diagnostics: Diagnostics,
}

impl<'g> DerivationContext<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        DerivationContext {
            graph,
            registry: Registry::default(),
            diagnostics: Diagnostics::new(graph.diagnostic_sink()),
        }
    }

    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Forgets every derived type and every notice already reported.
    pub fn clear_types_cache(&mut self) {
        tracing::debug!(types = self.registry.len(), "Clearing derived types");
        self.registry.types.clear();
        self.diagnostics.reset();
    }

    /// Returns the reference to `name`, deriving it with `f` if it is not registered yet.
    ///
    /// An empty input object stands in for the type while `f` runs and is replaced by its
    /// result. On error the entry is removed again.
    pub(crate) fn create_type<F>(&mut self, name: &str, f: F) -> Result<InputValueType>
    where
        F: FnOnce(&mut Self) -> Result<MetaType>,
    {
        if !self.registry.types.contains_key(name) {
            self.registry
                .types
                .insert(name.to_string(), InputObjectType::new(name, []).into());

            match f(self) {
                Ok(ty) => {
                    tracing::debug!("Derived type {name}");
                    self.registry.types.insert(name.to_string(), ty);
                }
                Err(error) => {
                    self.registry.types.remove(name);
                    return Err(error);
                }
            }
        }

        Ok(InputValueType::from(name))
    }

    /// Reference to a leaf (scalar or enum) type, registering a copy of the enum when needed.
    fn leaf_type(&mut self, ty: &FieldType) -> Result<InputValueType> {
        match ty.named_type() {
            NamedType::Scalar(scalar) => Ok(InputValueType::from(scalar.name())),
            NamedType::Enum(id) => self.mirror_enum(id),
            NamedType::Composite(id) => Ok(InputValueType::from(self.graph.composite(id)?.name())),
        }
    }

    fn mirror_enum(&mut self, id: EnumId) -> Result<InputValueType> {
        let graph = self.graph;
        let definition = graph.enum_definition(id)?;

        self.create_type(definition.name(), |_| {
            let enum_type = EnumType::new(definition.name(), definition.values().iter().map(MetaEnumValue::new));
            Ok(match definition.description() {
                Some(description) => enum_type.with_description(description),
                None => enum_type,
            }
            .into())
        })
    }

    /// Reports the computed fields of `id` that declare no dependencies, once per type.
    fn warn_unsafe_fields(&self, id: CompositeId) -> Result<()> {
        let composite = self.graph.composite(id)?;
        let fields = composite
            .fields()
            .filter(|field| field.is_unsafe())
            .map(|field| field.name().to_string())
            .collect_vec();

        if !fields.is_empty() {
            self.diagnostics.warn_once(Diagnostic::UnsafeComputedFields {
                ty: composite.name().to_string(),
                fields,
            });
        }

        Ok(())
    }

    fn derived_name(&self, id: CompositeId, suffix: &str) -> Result<String> {
        Ok(set_suffix(self.graph.composite(id)?.name(), suffix))
    }
}

/// `PersonType` becomes `Person<suffix>`, any other name gets the suffix appended.
pub(crate) fn set_suffix(name: &str, suffix: &str) -> String {
    let base = name.strip_suffix("Type").unwrap_or(name);
    format!("{base}{suffix}")
}

/// Applies the List wrappers of `ty` (and its NonNull wrappers if `keep_non_null`) to `named`.
fn wrap_like(ty: &FieldType, named: InputValueType, keep_non_null: bool) -> InputValueType {
    match ty {
        FieldType::List(inner) => wrap_like(inner, named, keep_non_null).list(),
        FieldType::NonNull(inner) if keep_non_null => wrap_like(inner, named, keep_non_null).non_null(),
        FieldType::NonNull(inner) => wrap_like(inner, named, keep_non_null),
        _ => named,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::{
        diagnostics::tests::RecordingSink,
        graph::ScalarType,
        registry::MetaInputValue,
        tests::{fixture, object_id},
        Error,
    };

    #[rstest]
    #[case("Person", "PersonFilterType")]
    #[case("PersonType", "PersonFilterType")]
    #[case("TypeOfThing", "TypeOfThingFilterType")]
    #[case("Type", "FilterType")]
    fn suffixes(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(set_suffix(name, "FilterType"), expected);
    }

    #[test]
    fn wrappers_are_mirrored() {
        let string = || FieldType::Scalar(ScalarType::String);
        let ty = FieldType::non_null(FieldType::list(FieldType::non_null(string())));

        assert_eq!(wrap_like(&ty, "StringFilter".into(), true).as_str(), "[StringFilter!]!");
        assert_eq!(wrap_like(&ty, "StringFilter".into(), false).as_str(), "[StringFilter]");
        assert_eq!(wrap_like(&string(), "String".into(), true).as_str(), "String");
    }

    #[test]
    fn failed_derivation_leaves_no_entry() {
        let graph = fixture();
        let mut context = DerivationContext::new(&graph);

        let error = context
            .create_type("Broken", |context| {
                context.create_type("Inner", |_| Ok(InputObjectType::new("Inner", []).into()))?;
                Err(Error::UnknownType("Missing".into()))
            })
            .unwrap_err();

        assert!(matches!(error, Error::UnknownType(_)));
        assert!(context.registry().lookup("Broken").is_none());
        assert!(context.registry().lookup("Inner").is_some());
    }

    #[test]
    fn placeholder_is_visible_while_deriving() {
        let graph = fixture();
        let mut context = DerivationContext::new(&graph);

        context
            .create_type("Cyclic", |context| {
                let inner = context.create_type("Cyclic", |_| Err(Error::UnknownType("unreachable".into())))?;
                Ok(InputObjectType::new("Cyclic", [MetaInputValue::new("self", inner)]).into())
            })
            .unwrap();

        let cyclic = context.registry().input_object("Cyclic").unwrap();
        assert_eq!(cyclic.field("self").unwrap().ty.as_str(), "Cyclic");
    }

    #[test]
    fn mutually_recursive_types_share_their_entries() {
        let graph = TypeGraph::from_sdl("type A { x: Int b: B } type B { y: Float a: A }").unwrap();
        let a = graph.composite_by_name("A").unwrap();
        let mut context = DerivationContext::new(&graph);

        context.filter_type(a, &[]).unwrap();
        context.sort_type(a, &[]).unwrap();
        context.update_type(a, &[]).unwrap();

        let references = [
            ("AFilterType", "b", "BObjectFilterType"),
            ("BObjectFilterType", "a", "AObjectFilterType"),
            ("AObjectFilterType", "b", "BObjectFilterType"),
            ("ASortType", "b", "BSortType"),
            ("BSortType", "a", "ASortType"),
            ("ASetType", "b", "BSetObjectType"),
            ("BSetObjectType", "a", "ASetObjectType"),
            ("ASetObjectType", "b", "BSetObjectType"),
            ("ASetOnInsertType", "b", "BSetOnInsertType"),
            ("BSetOnInsertType", "a", "ASetOnInsertType"),
        ];
        for (owner, field, expected) in references {
            let object = context.registry().input_object(owner).unwrap();
            assert_eq!(object.field(field).unwrap().ty.as_str(), expected, "{owner}.{field}");
        }
        assert!(context.registry().dangling_references(&[]).is_empty());
    }

    #[test]
    fn clearing_restarts_the_cycle() {
        let sink = Arc::new(RecordingSink::default());
        let graph = TypeGraph::from_sdl_with(
            "type Object { a: Int b: Int @computed }",
            TypeGraph::builder().with_diagnostic_sink(sink.clone()),
        )
        .unwrap();
        let object = graph.composite_by_name("Object").unwrap();
        let mut context = DerivationContext::new(&graph);

        context.filter_type(object, &[]).unwrap();
        context.filter_type(object, &[]).unwrap();
        assert_eq!(sink.recorded().len(), 1);

        context.clear_types_cache();
        assert!(context.registry().is_empty());

        context.filter_type(object, &[]).unwrap();
        assert_eq!(sink.recorded().len(), 2);
    }

    #[test]
    fn enums_are_mirrored_once() {
        let graph = fixture();
        let mut context = DerivationContext::new(&graph);

        context.filter_type(object_id(&graph), &[]).unwrap();
        context.sort_type(object_id(&graph), &[]).unwrap();

        let characters = context.registry().lookup("Characters").and_then(MetaType::as_enum).unwrap();
        assert_eq!(characters.enum_values.keys().collect_vec(), ["A", "B", "C"]);
        assert!(context.registry().dangling_references(&[]).is_empty());
    }
}
