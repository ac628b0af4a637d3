use std::borrow::Cow;

use crate::graph::CompositeId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown type '{0}'")]
    UnknownType(Cow<'static, str>),
    #[error("Type '{ty}' has no field named '{field}'")]
    UnknownField { ty: String, field: String },
    #[error("Invalid argument at '{path}': {reason}")]
    InvalidArgument { path: String, reason: Cow<'static, str> },
    #[error("The NOT filter on \"{path}\" may contain either REGEX (with OPTIONS) or other operators, not both")]
    NotRegexCombination { path: String },
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Sdl(#[from] async_graphql_parser::Error),
}

impl Error {
    pub(crate) fn invalid_argument(path: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Error::InvalidArgument {
            path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
            reason: reason.into(),
        }
    }
}

/// Every violation found while validating an update, reported together.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join("\n"))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Type '{0}' is referenced but declares no fields")]
    EmptyType(String),
    #[error("Type '{name}' cannot be declared both as {first} and as {second}")]
    ConflictingKind {
        name: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("Type {0} was not declared by this builder")]
    UndeclaredType(CompositeId),
    #[error("Field '{ty}.{field}' is declared twice")]
    DuplicateField { ty: String, field: String },
    #[error("Field '{ty}.{field}' references the unknown type '{target}'")]
    UnknownTypeReference { ty: String, field: String, target: String },
    #[error("Invalid @{directive} on '{ty}.{field}': {reason}")]
    InvalidDirective {
        directive: &'static str,
        ty: String,
        field: String,
        reason: String,
    },
}
