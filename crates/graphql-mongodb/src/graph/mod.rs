//! The base type graph derivations and compilers read from.
//!
//! Types live in an arena and refer to each other through [`CompositeId`] and [`EnumId`],
//! so cyclic graphs need no deferred construction.

mod builder;
mod sdl;

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;

pub use builder::TypeGraphBuilder;

use crate::{
    diagnostics::{DiagnosticSink, Diagnostics},
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(u32);

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for EnumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Id,
    String,
    Int,
    Float,
    Boolean,
    Custom(String),
}

impl ScalarType {
    pub fn from_name(name: &str) -> ScalarType {
        Self::builtin(name).unwrap_or_else(|| ScalarType::Custom(name.to_string()))
    }

    pub(crate) fn builtin(name: &str) -> Option<ScalarType> {
        Some(match name {
            "ID" => ScalarType::Id,
            "String" => ScalarType::String,
            "Int" => ScalarType::Int,
            "Float" => ScalarType::Float,
            "Boolean" => ScalarType::Boolean,
            _ => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ScalarType::Id => "ID",
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::Custom(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Int | ScalarType::Float)
    }
}

/// A field type stripped of its List and NonNull wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedType<'a> {
    Scalar(&'a ScalarType),
    Enum(EnumId),
    Composite(CompositeId),
}

/// The declared type of a field, wrappers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum(EnumId),
    Object(CompositeId),
    Interface(CompositeId),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
}

impl FieldType {
    pub fn list(of: FieldType) -> FieldType {
        FieldType::List(Box::new(of))
    }

    pub fn non_null(of: FieldType) -> FieldType {
        FieldType::NonNull(Box::new(of))
    }

    /// The named type inside every List and NonNull wrapper.
    pub fn unwrap_type(&self) -> &FieldType {
        match self {
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.unwrap_type(),
            named => named,
        }
    }

    /// Whether a List wrapper appears anywhere around the named type.
    pub fn is_list_type(&self) -> bool {
        match self {
            FieldType::List(_) => true,
            FieldType::NonNull(inner) => inner.is_list_type(),
            _ => false,
        }
    }

    /// Whether a NonNull wrapper appears anywhere around the named type, so `[String!]` counts.
    pub fn is_non_null_type(&self) -> bool {
        match self {
            FieldType::NonNull(_) => true,
            FieldType::List(inner) => inner.is_non_null_type(),
            _ => false,
        }
    }

    pub fn named_type(&self) -> NamedType<'_> {
        match self {
            FieldType::Scalar(scalar) => NamedType::Scalar(scalar),
            FieldType::Enum(id) => NamedType::Enum(*id),
            FieldType::Object(id) | FieldType::Interface(id) => NamedType::Composite(*id),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.named_type(), NamedType::Composite(_))
    }

    pub fn composite_id(&self) -> Option<CompositeId> {
        match self.named_type() {
            NamedType::Composite(id) => Some(id),
            _ => None,
        }
    }

    /// Drops the outermost NonNull wrapper if there is one.
    pub fn nullable(&self) -> &FieldType {
        match self {
            FieldType::NonNull(inner) => inner,
            other => other,
        }
    }
}

/// How a field value is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Read directly from the stored document.
    #[default]
    Stored,
    /// Produced by custom logic, optionally from the listed document paths.
    Computed { dependencies: Option<Vec<String>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    ty: FieldType,
    resolution: Resolution,
    description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Field {
            name: name.into(),
            ty,
            resolution: Resolution::Stored,
            description: None,
        }
    }

    /// Marks the field as computed without declared dependencies.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.resolution = Resolution::Computed { dependencies: None };
        self
    }

    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolution = Resolution::Computed {
            dependencies: Some(dependencies.into_iter().map(Into::into).collect()),
        };
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.resolution, Resolution::Computed { .. })
    }

    pub fn is_stored(&self) -> bool {
        !self.is_computed()
    }

    pub fn dependencies(&self) -> &[String] {
        match &self.resolution {
            Resolution::Computed {
                dependencies: Some(dependencies),
            } => dependencies,
            _ => &[],
        }
    }

    /// A computed field with no dependency list: nothing tells us what it reads.
    pub fn is_unsafe(&self) -> bool {
        matches!(self.resolution, Resolution::Computed { dependencies: None })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Object,
    Interface,
}

impl CompositeKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CompositeKind::Object => "an object",
            CompositeKind::Interface => "an interface",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompositeType {
    name: String,
    kind: CompositeKind,
    description: Option<String>,
    fields: IndexMap<String, Field>,
}

impl CompositeType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &Field> + '_ {
        self.fields.values()
    }

    pub(crate) fn field_or_err(&self, name: &str) -> Result<&Field> {
        self.field(name).ok_or_else(|| Error::UnknownField {
            ty: self.name.clone(),
            field: name.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EnumDefinition {
    name: String,
    description: Option<String>,
    values: Vec<String>,
}

impl EnumDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedId {
    Composite(CompositeId),
    Enum(EnumId),
    Scalar,
}

#[derive(Debug)]
pub struct TypeGraph {
    composites: Vec<CompositeType>,
    enums: Vec<EnumDefinition>,
    names: HashMap<String, NamedId>,
    diagnostics: Diagnostics,
}

impl TypeGraph {
    pub fn builder() -> TypeGraphBuilder {
        TypeGraphBuilder::default()
    }

    pub fn composite(&self, id: CompositeId) -> Result<&CompositeType> {
        self.composites
            .get(id.0 as usize)
            .ok_or_else(|| Error::UnknownType(id.to_string().into()))
    }

    pub fn composite_by_name(&self, name: &str) -> Option<CompositeId> {
        match self.names.get(name)? {
            NamedId::Composite(id) => Some(*id),
            _ => None,
        }
    }

    pub fn enum_definition(&self, id: EnumId) -> Result<&EnumDefinition> {
        self.enums
            .get(id.0 as usize)
            .ok_or_else(|| Error::UnknownType(id.to_string().into()))
    }

    /// Fields of `id` in declaration order, minus the `excluded` names and those rejected by
    /// `predicate`.
    pub fn fields_excluding<'a, P>(
        &'a self,
        id: CompositeId,
        predicate: P,
        excluded: &'a [&'a str],
    ) -> Result<impl Iterator<Item = &'a Field> + 'a>
    where
        P: Fn(&Field) -> bool + 'a,
    {
        Ok(self
            .composite(id)?
            .fields()
            .filter(move |field| !excluded.contains(&field.name()) && predicate(*field)))
    }

    /// Stored (non computed) fields, which every derivation is built from.
    pub fn stored_fields<'a>(
        &'a self,
        id: CompositeId,
        excluded: &'a [&'a str],
    ) -> Result<impl Iterator<Item = &'a Field> + 'a> {
        self.fields_excluding(id, Field::is_stored, excluded)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn diagnostic_sink(&self) -> Arc<dyn DiagnosticSink> {
        self.diagnostics.sink()
    }
}
