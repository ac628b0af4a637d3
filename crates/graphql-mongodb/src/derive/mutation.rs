use super::{wrap_like, DerivationContext};
use crate::{
    graph::{CompositeId, Field, FieldType},
    registry::{InputObjectType, InputValueType, MetaInputValue},
    update::{FICTIVE_INC, OVERWRITE},
    Result,
};

const OVERWRITE_DESCRIPTION: &str = "If set to true, the object is overwritten entirely, including the fields \
    that are not specified, and non-null validation rules apply. Once true, every child object is overwritten \
    whatever its own value for this field.";

const FICTIVE_INC_DESCRIPTION: &str = "IGNORE. Objects without incrementable fields still get an inc type, \
    since input object types must have at least one field";

const ID_FIELD: &str = "_id";

/// Where a set type is used: set objects nested within a list are always written whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetContext {
    Root,
    Object,
    List,
}

impl DerivationContext<'_> {
    /// `<Name>UpdateType`, the `update` argument of update mutations.
    pub fn update_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        let name = self.derived_name(id, "UpdateType")?;

        self.create_type(&name, |context| {
            let fields = [
                MetaInputValue::new("setOnInsert", context.set_on_insert_type(id, excluded)?),
                MetaInputValue::new("set", context.set_type(id, excluded)?),
                MetaInputValue::new("inc", context.inc_type(id, excluded)?),
            ];

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// `<Name>InsertType`: the full document shape, nullability included, except for an
    /// optional `_id` on the inserted document itself.
    pub fn insert_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        self.insert_object_type(id, excluded, true)
    }

    fn insert_object_type(&mut self, id: CompositeId, excluded: &[&str], root: bool) -> Result<InputValueType> {
        let name = self.derived_name(id, "InsertType")?;

        self.create_type(&name, |context| {
            let graph = context.graph;
            let mut fields = Vec::new();

            for field in graph.stored_fields(id, excluded)? {
                let named = match field.ty().composite_id() {
                    Some(nested) => context.insert_object_type(nested, &[], false)?,
                    None => context.leaf_type(field.ty())?,
                };

                let ty = if root && field.name() == ID_FIELD {
                    field.ty().nullable()
                } else {
                    field.ty()
                };
                fields.push(MetaInputValue::new(field.name(), wrap_like(ty, named, true)));
            }

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// `<Name>SetOnInsertType`, the `setOnInsert` part of an update: the full document shape
    /// with every NonNull dropped, since `set` may provide the rest of the document.
    pub fn set_on_insert_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        let name = self.derived_name(id, "SetOnInsertType")?;

        self.create_type(&name, |context| {
            let graph = context.graph;
            let mut fields = Vec::new();

            for field in graph.stored_fields(id, excluded)? {
                let named = match field.ty().composite_id() {
                    Some(nested) => context.set_on_insert_type(nested, &[])?,
                    None => context.leaf_type(field.ty())?,
                };
                fields.push(MetaInputValue::new(field.name(), wrap_like(field.ty(), named, false)));
            }

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// `<Name>SetType`, the `set` part of an update. Every field is optional.
    pub fn set_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        self.set_object_type(id, excluded, SetContext::Root)
    }

    fn set_object_type(&mut self, id: CompositeId, excluded: &[&str], set_context: SetContext) -> Result<InputValueType> {
        let suffix = match set_context {
            SetContext::Root => "SetType",
            SetContext::Object => "SetObjectType",
            SetContext::List => "SetListObjectType",
        };
        let name = self.derived_name(id, suffix)?;

        self.create_type(&name, |context| {
            let graph = context.graph;
            let mut fields = Vec::new();

            for field in graph.stored_fields(id, excluded)? {
                let named = match field.ty().composite_id() {
                    Some(nested) if set_context == SetContext::List || field.ty().is_list_type() => {
                        context.set_object_type(nested, &[], SetContext::List)?
                    }
                    Some(nested) => context.set_object_type(nested, &[], SetContext::Object)?,
                    None => context.leaf_type(field.ty())?,
                };
                fields.push(MetaInputValue::new(field.name(), wrap_like(field.ty(), named, false)));
            }

            if set_context != SetContext::List {
                fields.push(MetaInputValue::new(OVERWRITE, "Boolean").with_description(OVERWRITE_DESCRIPTION));
            }

            Ok(InputObjectType::new(&name, fields).into())
        })
    }

    /// `<Name>IncType`: the numeric fields outside of lists.
    pub fn inc_type(&mut self, id: CompositeId, excluded: &[&str]) -> Result<InputValueType> {
        let name = self.derived_name(id, "IncType")?;

        self.create_type(&name, |context| {
            let graph = context.graph;
            let mut fields = Vec::new();

            for field in graph.stored_fields(id, excluded)? {
                if field.ty().is_list_type() {
                    continue;
                }

                let ty = match field.ty().composite_id() {
                    Some(nested) => context.inc_type(nested, &[])?,
                    None if is_numeric(field) => context.leaf_type(field.ty())?,
                    None => continue,
                };
                fields.push(MetaInputValue::new(field.name(), ty));
            }

            if fields.is_empty() {
                fields.push(MetaInputValue::new(FICTIVE_INC, "Int").with_description(FICTIVE_INC_DESCRIPTION));
            }

            Ok(InputObjectType::new(&name, fields).into())
        })
    }
}

fn is_numeric(field: &Field) -> bool {
    matches!(field.ty().unwrap_type(), FieldType::Scalar(scalar) if scalar.is_numeric())
}
