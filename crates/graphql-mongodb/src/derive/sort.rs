use strum::IntoEnumIterator;

use super::DerivationContext;
use crate::{
    graph::CompositeId,
    registry::{Deprecation, EnumType, InputObjectType, InputValueType, MetaEnumValue, MetaInputValue},
    sort::{SortDirection, FICTIVE_SORT},
    Result,
};

const FICTIVE_SORT_DESCRIPTION: &str = "IGNORE. Objects without sortable fields still get a sort type, \
    since input object types must have at least one field";

impl DerivationContext<'_> {
    /// `<Name>SortType`: a direction per stored leaf field, nested sort types for objects.
    /// List fields cannot be sorted on and are left out.
    pub fn sort_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        let name = self.derived_name(id, "SortType")?;

        self.create_type(&name, |context| {
            let graph = context.graph;
            let mut fields = Vec::new();

            for field in graph.stored_fields(id, excluded)? {
                if field.ty().is_list_type() {
                    continue;
                }

                let ty = match field.ty().composite_id() {
                    Some(nested) => context.sort_type(nested, &[])?,
                    None => context.sort_direction_type()?,
                };
                fields.push(MetaInputValue::new(field.name(), ty));
            }

            if fields.is_empty() {
                let placeholder = MetaInputValue::new(FICTIVE_SORT, context.sort_direction_type()?)
                    .with_description(FICTIVE_SORT_DESCRIPTION);
                fields.push(MetaInputValue {
                    deprecation: Deprecation::Deprecated { reason: None },
                    ..placeholder
                });
            }

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// The shared `SortType` enum.
    pub fn sort_direction_type(&mut self) -> Result<InputValueType> {
        self.create_type("SortType", |_| {
            let values =
                SortDirection::iter().map(|direction| MetaEnumValue::new(direction.to_string()).with_value(direction.value()));
            Ok(EnumType::new("SortType", values).into())
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use serde_json::json;

    use super::*;
    use crate::{
        graph::TypeGraph,
        sort::compile_sort,
        tests::{fixture, object_id},
    };

    #[test]
    fn lists_are_left_out() {
        let graph = fixture();
        let mut context = DerivationContext::new(&graph);

        context.sort_type(object_id(&graph), &["_id"]).unwrap();

        let sort = context.registry().input_object("ObjectSortType").unwrap();
        assert_eq!(
            sort.input_fields
                .values()
                .map(|field| format!("{}: {}", field.name, field.ty))
                .collect_vec(),
            [
                "stringScalar: SortType",
                "intScalar: SortType",
                "floatScalar: SortType",
                "enumScalar: SortType",
                "nested: NestedSortType",
                "nonNullScalar: SortType",
            ]
        );

        let nested = context.registry().input_object("NestedSortType").unwrap();
        assert_eq!(nested.field("recursive").unwrap().ty.as_str(), "NestedSortType");
    }

    #[test]
    fn direction_values() {
        let graph = fixture();
        let mut context = DerivationContext::new(&graph);
        context.sort_direction_type().unwrap();

        let directions = context.registry().lookup("SortType").and_then(|ty| ty.as_enum()).unwrap();
        assert_eq!(
            directions
                .enum_values
                .values()
                .map(|value| (value.name.as_str(), value.value.clone()))
                .collect_vec(),
            [("ASC", Some(json!(1))), ("DESC", Some(json!(-1)))]
        );
    }

    #[test]
    fn only_lists_get_the_placeholder() {
        let graph = TypeGraph::from_sdl("type Tags { names: [String] counts: [Int!]! }").unwrap();
        let tags = graph.composite_by_name("Tags").unwrap();
        let mut context = DerivationContext::new(&graph);

        context.sort_type(tags, &[]).unwrap();

        let sort = context.registry().input_object("TagsSortType").unwrap();
        assert_eq!(sort.field_names().collect_vec(), [FICTIVE_SORT]);
        assert!(sort.field(FICTIVE_SORT).unwrap().deprecation.is_deprecated());

        assert!(compile_sort(Some(&json!({"_FICTIVE_SORT": 1}))).unwrap().is_empty());
    }
}
