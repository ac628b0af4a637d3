//! Derived input types, keyed by name.

mod export_sdl;
mod type_names;

use std::collections::BTreeMap;

use indexmap::IndexMap;

pub use type_names::InputValueType;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Deprecation {
    #[default]
    NoDeprecated,
    Deprecated { reason: Option<String> },
}

impl Deprecation {
    #[inline]
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaInputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: InputValueType,
    pub deprecation: Deprecation,
}

impl MetaInputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<InputValueType>) -> MetaInputValue {
        MetaInputValue {
            name: name.into(),
            description: None,
            ty: ty.into(),
            deprecation: Deprecation::NoDeprecated,
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> MetaInputValue {
        MetaInputValue {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_deprecation(self, reason: impl Into<String>) -> MetaInputValue {
        MetaInputValue {
            deprecation: Deprecation::Deprecated {
                reason: Some(reason.into()),
            },
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub input_fields: IndexMap<String, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>, input_fields: impl IntoIterator<Item = MetaInputValue>) -> Self {
        InputObjectType {
            name: name.into(),
            description: None,
            input_fields: input_fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        InputObjectType {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn field(&self, name: &str) -> Option<&MetaInputValue> {
        self.input_fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.input_fields.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaEnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
    /// What the value stands for once compiled, when it differs from its name.
    pub value: Option<serde_json::Value>,
}

impl MetaEnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        MetaEnumValue {
            name: name.into(),
            description: None,
            deprecation: Deprecation::NoDeprecated,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(self, value: impl Into<serde_json::Value>) -> Self {
        MetaEnumValue {
            value: Some(value.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub enum_values: IndexMap<String, MetaEnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, enum_values: impl IntoIterator<Item = MetaEnumValue>) -> Self {
        EnumType {
            name: name.into(),
            description: None,
            enum_values: enum_values
                .into_iter()
                .map(|value| (value.name.clone(), value))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        EnumType {
            description: Some(description.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaType {
    InputObject(InputObjectType),
    Enum(EnumType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::InputObject(input) => &input.name,
            MetaType::Enum(enum_type) => &enum_type.name,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            MetaType::InputObject(input) => Some(input),
            MetaType::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            MetaType::Enum(enum_type) => Some(enum_type),
            MetaType::InputObject(_) => None,
        }
    }
}

impl From<InputObjectType> for MetaType {
    fn from(value: InputObjectType) -> Self {
        MetaType::InputObject(value)
    }
}

impl From<EnumType> for MetaType {
    fn from(value: EnumType) -> Self {
        MetaType::Enum(value)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Registry {
    pub types: BTreeMap<String, MetaType>,
}

impl Registry {
    pub fn lookup(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        self.lookup(name).and_then(MetaType::as_input_object)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Input fields whose named type is neither registered nor a scalar of the base graph.
    pub fn dangling_references<'a>(&'a self, scalars: &'a [&'a str]) -> Vec<(&'a str, &'a str)> {
        self.types
            .values()
            .filter_map(MetaType::as_input_object)
            .flat_map(|input| input.input_fields.values().map(move |field| (input, field)))
            .filter(|(_, field)| {
                let named = field.ty.named_type();
                !self.types.contains_key(named) && !is_builtin_scalar(named) && !scalars.contains(&named)
            })
            .map(|(input, field)| (input.name.as_str(), field.name.as_str()))
            .collect()
    }
}

fn is_builtin_scalar(name: &str) -> bool {
    matches!(name, "String" | "Float" | "Boolean" | "ID" | "Int")
}
