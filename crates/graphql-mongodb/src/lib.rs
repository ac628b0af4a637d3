//! MongoDB input types and query documents derived from a GraphQL type graph.
//!
//! A [`TypeGraph`] describes the stored documents. A [`DerivationContext`] derives the
//! filter, sort, insert, update and pagination input types of its object types, and the
//! compilers of [`filter`], [`sort`], [`update`] and [`projection`] turn the matching field
//! arguments into MongoDB documents. The [`resolver`] factories glue both together around a
//! store callback.

pub mod diagnostics;
mod derive;
mod error;
pub mod filter;
pub mod graph;
pub mod pagination;
mod path;
pub mod projection;
pub mod registry;
pub mod resolver;
pub mod sort;
pub mod update;

#[cfg(test)]
mod tests;

pub use derive::DerivationContext;
pub use error::{BuildError, Error, Result, ValidationErrors};
pub use graph::TypeGraph;

/// A JSON object, the shape of field arguments and of every compiled document.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
