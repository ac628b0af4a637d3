use strum::IntoEnumIterator;

use super::DerivationContext;
use crate::{
    filter::{ExistsOperator, LeafOperator, LegacyOperator, COMBINATORS},
    graph::{CompositeId, FieldType, NamedType, ScalarType},
    registry::{EnumType, InputObjectType, InputValueType, MetaEnumValue, MetaInputValue},
    Result,
};

const LEGACY_DEPRECATION: &str = "Switched to the more intuitive operator fields";

const OPTIONS_DESCRIPTION: &str = "Modifiers of the REGEX operator, such as \"i\" for case insensitive matching. \
    Used as the regular expression flags when the REGEX is negated";

impl DerivationContext<'_> {
    /// `<Name>FilterType`: the filters of the stored fields of `id` combined with `OR`, `AND`
    /// and `NOR` lists of itself.
    pub fn filter_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        let name = self.derived_name(id, "FilterType")?;

        self.create_type(&name, |context| {
            let mut fields = context.object_filter_fields(id, excluded)?;
            context.warn_unsafe_fields(id)?;

            let this = InputValueType::from(name.as_str()).list();
            fields.extend(
                COMBINATORS
                    .iter()
                    .map(|(combinator, _)| MetaInputValue::new(*combinator, this.clone())),
            );

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// `<Name>ObjectFilterType`, the filter of a nested object, which can also test the
    /// presence of the object itself through `opr`.
    pub fn object_filter_type(&mut self, id: CompositeId) -> Result<InputValueType> {
        let name = self.derived_name(id, "ObjectFilterType")?;

        self.create_type(&name, |context| {
            let mut fields = context.object_filter_fields(id, &[])?;
            context.warn_unsafe_fields(id)?;

            fields.push(MetaInputValue::new("opr", context.opr_exists_type()?));

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    fn object_filter_fields(&mut self, id: CompositeId, excluded: &[&str]) -> Result<Vec<MetaInputValue>> {
        let graph = self.graph;
        let mut fields = Vec::new();

        for field in graph.stored_fields(id, excluded)? {
            let ty = match field.ty().composite_id() {
                Some(nested) => self.object_filter_type(nested)?,
                None => self.leaf_filter_type(field.ty())?,
            };

            let mut input = MetaInputValue::new(field.name(), ty);
            if let Some(description) = field.description() {
                input = input.with_description(description);
            }
            fields.push(input);
        }

        Ok(fields)
    }

    /// `<Leaf>Filter`, the operators applicable to a scalar or enum, whether it is a single
    /// value or a list.
    pub fn leaf_filter_type(&mut self, ty: &FieldType) -> Result<InputValueType> {
        let leaf = self.leaf_type(ty)?;
        let is_string = matches!(ty.named_type(), NamedType::Scalar(ScalarType::String));
        let name = format!("{leaf}Filter");

        self.create_type(&name, |context| {
            let mut fields = operator_fields(&leaf, is_string);
            fields.push(MetaInputValue::new(
                LeafOperator::Not.as_ref(),
                context.not_filter_type(&leaf, is_string)?,
            ));

            fields.push(MetaInputValue::new("opr", context.opr_type()?).with_deprecation(LEGACY_DEPRECATION));
            fields.push(MetaInputValue::new("value", leaf.clone()).with_deprecation(LEGACY_DEPRECATION));
            fields.push(MetaInputValue::new("values", leaf.clone().list()).with_deprecation(LEGACY_DEPRECATION));
            fields.push(MetaInputValue::new("NEQ", leaf.clone()).with_deprecation("use NE"));

            Ok(InputObjectType::new(&name, fields)
                .with_description(format!("Filter type for {leaf} scalar"))
                .into())
        })
    }

    fn not_filter_type(&mut self, leaf: &InputValueType, is_string: bool) -> Result<InputValueType> {
        let name = format!("{leaf}NotFilter");

        self.create_type(&name, |_| {
            Ok(InputObjectType::new(&name, operator_fields(leaf, is_string))
                .with_description(format!("Filter type for $not of {leaf} scalar"))
                .into())
        })
    }

    /// The deprecated `Opr` enum, whose values stand for the MongoDB operators.
    fn opr_type(&mut self) -> Result<InputValueType> {
        self.create_type("Opr", |_| {
            let values = LegacyOperator::iter()
                .map(|operator| MetaEnumValue::new(operator.as_ref()).with_value(operator.operator().native()));
            Ok(EnumType::new("Opr", values).into())
        })
    }

    fn opr_exists_type(&mut self) -> Result<InputValueType> {
        self.create_type("OprExists", |_| {
            let values =
                ExistsOperator::iter().map(|operator| MetaEnumValue::new(operator.as_ref()).with_value(operator.native()));
            Ok(EnumType::new("OprExists", values).into())
        })
    }
}

/// Every operator but `NOT`, with REGEX and OPTIONS only for strings.
fn operator_fields(leaf: &InputValueType, is_string: bool) -> Vec<MetaInputValue> {
    LeafOperator::iter()
        .filter(|operator| *operator != LeafOperator::Not && (is_string || !operator.is_string_only()))
        .map(|operator| {
            let ty = if operator.takes_list() {
                leaf.clone().list()
            } else {
                leaf.clone()
            };
            let description = match operator {
                LeafOperator::Options => OPTIONS_DESCRIPTION,
                other => other.native(),
            };

            MetaInputValue::new(operator.as_ref(), ty).with_description(description)
        })
        .collect()
}
