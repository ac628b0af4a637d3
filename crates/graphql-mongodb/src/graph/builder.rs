use std::{collections::HashMap, sync::Arc};

use indexmap::map::Entry;

use super::{
    CompositeId, CompositeKind, CompositeType, EnumDefinition, EnumId, Field, FieldType, NamedId, ScalarType, TypeGraph,
};
use crate::{
    diagnostics::{DiagnosticSink, Diagnostics},
    error::BuildError,
};

/// Declares types by name and collects their fields.
///
/// Composite types are get-or-declare, so a field may reference a type before its own
/// fields are known, including the type currently being defined.
#[derive(Default)]
pub struct TypeGraphBuilder {
    composites: Vec<CompositeType>,
    enums: Vec<EnumDefinition>,
    names: HashMap<String, NamedId>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl TypeGraphBuilder {
    #[must_use]
    pub fn with_diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn object(&mut self, name: &str) -> Result<CompositeId, BuildError> {
        self.declare_composite(name, CompositeKind::Object)
    }

    pub fn interface(&mut self, name: &str) -> Result<CompositeId, BuildError> {
        self.declare_composite(name, CompositeKind::Interface)
    }

    pub fn enumeration<I, S>(&mut self, name: &str, values: I) -> Result<EnumId, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(existing) = self.names.get(name) {
            return Err(self.conflict(name, *existing, "an enum"));
        }

        let id = EnumId(self.enums.len() as u32);
        self.enums.push(EnumDefinition {
            name: name.to_string(),
            description: None,
            values: values.into_iter().map(Into::into).collect(),
        });
        self.names.insert(name.to_string(), NamedId::Enum(id));

        Ok(id)
    }

    /// Declares a custom scalar, returning the field type referencing it.
    pub fn scalar(&mut self, name: &str) -> Result<FieldType, BuildError> {
        if let Some(builtin) = ScalarType::builtin(name) {
            return Ok(FieldType::Scalar(builtin));
        }

        match self.names.get(name) {
            None => {
                self.names.insert(name.to_string(), NamedId::Scalar);
            }
            Some(NamedId::Scalar) => {}
            Some(existing) => return Err(self.conflict(name, *existing, "a scalar")),
        }

        Ok(FieldType::Scalar(ScalarType::Custom(name.to_string())))
    }

    pub fn describe(&mut self, id: CompositeId, description: impl Into<String>) {
        if let Some(composite) = self.composites.get_mut(id.0 as usize) {
            composite.description = Some(description.into());
        }
    }

    pub fn describe_enum(&mut self, id: EnumId, description: impl Into<String>) {
        if let Some(definition) = self.enums.get_mut(id.0 as usize) {
            definition.description = Some(description.into());
        }
    }

    pub fn field(&mut self, owner: CompositeId, field: Field) -> Result<(), BuildError> {
        let Some(composite) = self.composites.get_mut(owner.0 as usize) else {
            return Err(BuildError::UndeclaredType(owner));
        };

        match composite.fields.entry(field.name.clone()) {
            Entry::Occupied(_) => Err(BuildError::DuplicateField {
                ty: composite.name.clone(),
                field: field.name,
            }),
            Entry::Vacant(entry) => {
                entry.insert(field);
                Ok(())
            }
        }
    }

    pub(super) fn lookup(&self, name: &str) -> Option<NamedId> {
        self.names.get(name).copied()
    }

    pub(super) fn composite_kind(&self, id: CompositeId) -> Option<CompositeKind> {
        self.composites.get(id.0 as usize).map(|composite| composite.kind)
    }

    pub fn build(self) -> Result<TypeGraph, BuildError> {
        for composite in &self.composites {
            if composite.fields.is_empty() {
                return Err(BuildError::EmptyType(composite.name.clone()));
            }

            for field in composite.fields.values() {
                self.check_reference(composite, field, field.ty.unwrap_type())?;
            }
        }

        let diagnostics = self.sink.map(Diagnostics::new).unwrap_or_default();

        tracing::debug!(
            composites = self.composites.len(),
            enums = self.enums.len(),
            "Built type graph"
        );

        Ok(TypeGraph {
            composites: self.composites,
            enums: self.enums,
            names: self.names,
            diagnostics,
        })
    }

    fn check_reference(&self, owner: &CompositeType, field: &Field, named: &FieldType) -> Result<(), BuildError> {
        let unknown = || BuildError::UnknownTypeReference {
            ty: owner.name.clone(),
            field: field.name.clone(),
            target: match named {
                FieldType::Object(id) | FieldType::Interface(id) => id.to_string(),
                FieldType::Enum(id) => format!("#{}", id.0),
                _ => String::new(),
            },
        };

        let (id, expected) = match named {
            FieldType::Object(id) => (*id, CompositeKind::Object),
            FieldType::Interface(id) => (*id, CompositeKind::Interface),
            FieldType::Enum(id) => {
                return match self.enums.get(id.0 as usize) {
                    Some(_) => Ok(()),
                    None => Err(unknown()),
                };
            }
            _ => return Ok(()),
        };

        let target = self.composites.get(id.0 as usize).ok_or_else(unknown)?;

        if target.kind != expected {
            return Err(BuildError::ConflictingKind {
                name: target.name.clone(),
                first: target.kind.as_str(),
                second: expected.as_str(),
            });
        }

        Ok(())
    }

    fn declare_composite(&mut self, name: &str, kind: CompositeKind) -> Result<CompositeId, BuildError> {
        match self.names.get(name) {
            Some(NamedId::Composite(id)) => match self.composite_kind(*id) {
                Some(existing) if existing != kind => Err(BuildError::ConflictingKind {
                    name: name.to_string(),
                    first: existing.as_str(),
                    second: kind.as_str(),
                }),
                _ => Ok(*id),
            },
            Some(other) => Err(self.conflict(name, *other, kind.as_str())),
            None => {
                let id = CompositeId(self.composites.len() as u32);
                self.composites.push(CompositeType {
                    name: name.to_string(),
                    kind,
                    description: None,
                    fields: Default::default(),
                });
                self.names.insert(name.to_string(), NamedId::Composite(id));
                Ok(id)
            }
        }
    }

    fn conflict(&self, name: &str, existing: NamedId, second: &'static str) -> BuildError {
        let first = match existing {
            NamedId::Composite(id) => self.composite_kind(id).map_or("a composite", CompositeKind::as_str),
            NamedId::Enum(_) => "an enum",
            NamedId::Scalar => "a scalar",
        };

        BuildError::ConflictingKind {
            name: name.to_string(),
            first,
            second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursive_type_is_declared_once() {
        let mut builder = TypeGraph::builder();
        let node = builder.object("Node").unwrap();
        assert_eq!(builder.object("Node").unwrap(), node);

        builder
            .field(node, Field::new("value", FieldType::Scalar(ScalarType::Int)))
            .unwrap();
        builder.field(node, Field::new("next", FieldType::Object(node))).unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.composite_by_name("Node"), Some(node));
        assert_eq!(
            graph.composite(node).unwrap().field("next").unwrap().ty(),
            &FieldType::Object(node)
        );
    }

    #[test]
    fn referenced_type_without_fields() {
        let mut builder = TypeGraph::builder();
        let object = builder.object("Object").unwrap();
        let missing = builder.object("Missing").unwrap();
        builder
            .field(object, Field::new("missing", FieldType::Object(missing)))
            .unwrap();

        assert_eq!(builder.build().unwrap_err(), BuildError::EmptyType("Missing".into()));
    }

    #[test]
    fn conflicting_declarations() {
        let mut builder = TypeGraph::builder();
        builder.enumeration("Color", ["RED"]).unwrap();
        builder.object("Shape").unwrap();

        assert!(matches!(
            builder.interface("Shape"),
            Err(BuildError::ConflictingKind { first: "an object", .. })
        ));
        assert!(matches!(
            builder.object("Color"),
            Err(BuildError::ConflictingKind { first: "an enum", .. })
        ));
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut other = TypeGraph::builder();
        other.object("First").unwrap();
        let foreign = other.object("Second").unwrap();

        let mut builder = TypeGraph::builder();
        builder.object("Only").unwrap();

        assert_eq!(
            builder.field(foreign, Field::new("a", FieldType::Scalar(ScalarType::Int))),
            Err(BuildError::UndeclaredType(foreign))
        );
    }

    #[test]
    fn stale_ids_are_errors_on_the_graph() {
        let mut other = TypeGraph::builder();
        other.object("First").unwrap();
        let foreign = other.object("Second").unwrap();
        let colors = other.enumeration("Color", ["RED"]).unwrap();

        let mut builder = TypeGraph::builder();
        let only = builder.object("Only").unwrap();
        builder
            .field(only, Field::new("a", FieldType::Scalar(ScalarType::Int)))
            .unwrap();
        let graph = builder.build().unwrap();

        assert!(matches!(graph.composite(foreign), Err(crate::Error::UnknownType(_))));
        assert!(matches!(graph.enum_definition(colors), Err(crate::Error::UnknownType(_))));
    }

    #[test]
    fn duplicate_field() {
        let mut builder = TypeGraph::builder();
        let object = builder.object("Object").unwrap();
        builder
            .field(object, Field::new("a", FieldType::Scalar(ScalarType::Int)))
            .unwrap();

        assert_eq!(
            builder.field(object, Field::new("a", FieldType::Scalar(ScalarType::String))),
            Err(BuildError::DuplicateField {
                ty: "Object".into(),
                field: "a".into()
            })
        );
    }
}
