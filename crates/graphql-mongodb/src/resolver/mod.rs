//! Resolver factories running the compilers in sequence before handing the documents to a
//! store callback.

mod options;
mod query;
mod update;

pub use options::{QueryOptions, ResolvedFieldPredicate, UpdateResolverOptions};
pub use query::{FindQuery, QueryCallback, QueryResolver};
pub use update::{UpdateCallback, UpdateQuery, UpdateResolver};

use crate::{projection::ResolveInfo, JsonMap};

/// What the resolver received, passed through to the callback untouched.
#[derive(Debug)]
pub struct FieldContext<'a, S, C> {
    pub source: &'a S,
    pub args: &'a JsonMap,
    pub context: &'a C,
    pub info: &'a ResolveInfo<'a>,
}

impl<S, C> Clone for FieldContext<'_, S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, C> Copy for FieldContext<'_, S, C> {}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::Error;

    /// Records every query it receives and answers with a fixed document.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) queries: Mutex<Vec<Value>>,
    }

    impl Recorder {
        pub(crate) fn recorded(&self) -> Vec<Value> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryCallback for Recorder {
        type Source = ();
        type Context = String;
        type Output = Value;
        type Error = Error;

        async fn find(&self, query: FindQuery, field: FieldContext<'_, (), String>) -> Result<Value, Error> {
            let recorded = serde_json::to_value(&query).unwrap();
            self.queries.lock().unwrap().push(recorded);
            Ok(Value::String(field.context.clone()))
        }
    }

    #[async_trait]
    impl UpdateCallback for Recorder {
        type Source = ();
        type Context = String;
        type Output = Value;
        type Error = Error;

        async fn update(&self, query: UpdateQuery, field: FieldContext<'_, (), String>) -> Result<Value, Error> {
            let recorded = serde_json::to_value(&query).unwrap();
            self.queries.lock().unwrap().push(recorded);
            Ok(Value::String(field.context.clone()))
        }
    }
}
