use async_graphql_parser::types::{
    BaseType, ConstDirective, FieldDefinition, Type, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use async_graphql_value::ConstValue;

use super::{CompositeId, CompositeKind, Field, FieldType, NamedId, TypeGraph, TypeGraphBuilder};
use crate::{error::BuildError, Result};

const DEPENDENCIES_DIRECTIVE: &str = "mongoDependencies";
const COMPUTED_DIRECTIVE: &str = "computed";

impl TypeGraph {
    /// Reads object, interface, enum and scalar definitions from a GraphQL schema document.
    ///
    /// A field annotated with `@mongoDependencies(paths: [...])` is computed from the listed
    /// document paths, one annotated with `@computed` is computed from unknown inputs.
    pub fn from_sdl(sdl: &str) -> Result<TypeGraph> {
        Self::from_sdl_with(sdl, TypeGraph::builder())
    }

    pub fn from_sdl_with(sdl: &str, mut builder: TypeGraphBuilder) -> Result<TypeGraph> {
        let document = async_graphql_parser::parse_schema(sdl)?;

        let definitions = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                TypeSystemDefinition::Type(definition) => Some(&definition.node),
                _ => None,
            })
            .collect::<Vec<_>>();

        // Declare every name first so fields can reference types defined later on.
        let mut composites = Vec::new();
        for definition in &definitions {
            let name = definition.name.node.as_str();
            match &definition.kind {
                TypeKind::Object(object) => {
                    let id = builder.object(name)?;
                    composites.push((id, *definition, object.fields.as_slice()));
                }
                TypeKind::Interface(interface) => {
                    let id = builder.interface(name)?;
                    composites.push((id, *definition, interface.fields.as_slice()));
                }
                TypeKind::Enum(enumeration) => {
                    let id = builder.enumeration(
                        name,
                        enumeration.values.iter().map(|value| value.node.value.node.to_string()),
                    )?;
                    if let Some(description) = &definition.description {
                        builder.describe_enum(id, description.node.clone());
                    }
                }
                TypeKind::Scalar => {
                    builder.scalar(name)?;
                }
                TypeKind::Union(_) | TypeKind::InputObject(_) => {
                    tracing::debug!("Skipping definition of {name}, only output types are read");
                }
            }
        }

        for (id, definition, fields) in composites {
            if let Some(description) = &definition.description {
                builder.describe(id, description.node.clone());
            }

            for field in fields {
                let field = convert_field(&mut builder, definition, &field.node)?;
                builder.field(id, field)?;
            }
        }

        Ok(builder.build()?)
    }
}

fn convert_field(
    builder: &mut TypeGraphBuilder,
    owner: &TypeDefinition,
    definition: &FieldDefinition,
) -> Result<Field, BuildError> {
    let ty = convert_type(builder, owner, definition, &definition.ty.node)?;
    let mut field = Field::new(definition.name.node.as_str(), ty);

    if let Some(description) = &definition.description {
        field = field.with_description(description.node.clone());
    }

    for directive in &definition.directives {
        match directive.node.name.node.as_str() {
            DEPENDENCIES_DIRECTIVE => {
                let paths = dependency_paths(&directive.node).map_err(|reason| BuildError::InvalidDirective {
                    directive: DEPENDENCIES_DIRECTIVE,
                    ty: owner.name.node.to_string(),
                    field: definition.name.node.to_string(),
                    reason: reason.to_string(),
                })?;
                field = field.with_dependencies(paths);
            }
            COMPUTED_DIRECTIVE if !field.is_computed() => field = field.computed(),
            _ => {}
        }
    }

    Ok(field)
}

fn dependency_paths(directive: &ConstDirective) -> Result<Vec<String>, &'static str> {
    let Some(paths) = directive.get_argument("paths") else {
        return Err("the paths argument is required");
    };

    let values = match &paths.node {
        ConstValue::List(values) => values.as_slice(),
        value @ ConstValue::String(_) => std::slice::from_ref(value),
        _ => return Err("paths must be a list of strings"),
    };

    values
        .iter()
        .map(|value| match value {
            ConstValue::String(path) => Ok(path.clone()),
            _ => Err("paths must be a list of strings"),
        })
        .collect()
}

fn convert_type(
    builder: &mut TypeGraphBuilder,
    owner: &TypeDefinition,
    field: &FieldDefinition,
    ty: &Type,
) -> Result<FieldType, BuildError> {
    let base = match &ty.base {
        BaseType::Named(name) => named_type(builder, name.as_str()).ok_or_else(|| BuildError::UnknownTypeReference {
            ty: owner.name.node.to_string(),
            field: field.name.node.to_string(),
            target: name.to_string(),
        })?,
        BaseType::List(inner) => FieldType::list(convert_type(builder, owner, field, inner)?),
    };

    Ok(if ty.nullable { base } else { FieldType::non_null(base) })
}

fn named_type(builder: &mut TypeGraphBuilder, name: &str) -> Option<FieldType> {
    match builder.lookup(name) {
        Some(NamedId::Composite(id)) => composite_type(builder, id),
        Some(NamedId::Enum(id)) => Some(FieldType::Enum(id)),
        Some(NamedId::Scalar) => builder.scalar(name).ok(),
        None => super::ScalarType::builtin(name).map(FieldType::Scalar),
    }
}

fn composite_type(builder: &TypeGraphBuilder, id: CompositeId) -> Option<FieldType> {
    Some(match builder.composite_kind(id)? {
        CompositeKind::Object => FieldType::Object(id),
        CompositeKind::Interface => FieldType::Interface(id),
    })
}
