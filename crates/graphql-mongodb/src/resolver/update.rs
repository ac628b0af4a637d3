use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use super::{options::excluded, FieldContext, UpdateResolverOptions};
use crate::{
    filter::compile_filter,
    graph::{CompositeId, TypeGraph},
    projection::{compile_projection, ResolveInfo},
    update::{compile_update, validate_update_args, UpdateOptions},
    Error, JsonMap, Result,
};

/// Everything a store needs to run an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateQuery {
    pub filter: JsonMap,
    pub update: JsonMap,
    pub options: UpdateOptions,
    pub projection: Option<JsonMap>,
}

#[async_trait]
pub trait UpdateCallback: Send + Sync {
    type Source: Sync;
    type Context: Sync;
    type Output: Send;
    type Error: From<Error> + Send;

    async fn update(
        &self,
        query: UpdateQuery,
        field: FieldContext<'_, Self::Source, Self::Context>,
    ) -> Result<Self::Output, Self::Error>;
}

/// Resolves update mutations on documents of one type.
pub struct UpdateResolver<'g, C> {
    graph: &'g TypeGraph,
    ty: CompositeId,
    callback: C,
    options: UpdateResolverOptions,
}

impl<'g, C: UpdateCallback> UpdateResolver<'g, C> {
    pub fn new(graph: &'g TypeGraph, ty: CompositeId, callback: C, options: UpdateResolverOptions) -> Result<Self> {
        graph.composite(ty)?;

        Ok(UpdateResolver {
            graph,
            ty,
            callback,
            options,
        })
    }

    pub fn options(&self) -> &UpdateResolverOptions {
        &self.options
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub async fn resolve(
        &self,
        source: &C::Source,
        args: &JsonMap,
        context: &C::Context,
        info: &ResolveInfo<'_>,
    ) -> Result<C::Output, C::Error> {
        let ty = self.graph.composite(self.ty)?.name();
        let span = tracing::debug_span!("update_resolver", ty);

        async move {
            let query = self.compile(args, info)?;
            tracing::debug!(upsert = query.options.upsert, "Calling the update callback");

            let field = FieldContext {
                source,
                args,
                context,
                info,
            };
            self.callback.update(query, field).await
        }
        .instrument(span)
        .await
    }

    fn compile(&self, args: &JsonMap, info: &ResolveInfo<'_>) -> Result<UpdateQuery> {
        let filter = compile_filter(self.graph, self.ty, args.get("filter"))?;

        let update = match args.get("update") {
            Some(Value::Object(update)) => update,
            _ => return Err(Error::invalid_argument("update", "expected an object")),
        };

        let is_resolved_field = self.options.is_resolved_field.get();
        if self.options.validate_update_args {
            validate_update_args(self.graph, self.ty, update, self.options.overwrite, is_resolved_field)?;
        }

        let compiled = compile_update(update, self.options.overwrite)?;

        let projection = if self.options.different_output_type {
            None
        } else {
            Some(compile_projection(
                self.graph,
                self.ty,
                info,
                &excluded(&self.options.excluded_fields),
                is_resolved_field,
            )?)
        };

        Ok(UpdateQuery {
            filter,
            update: compiled.update,
            options: compiled.options,
            projection,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        resolver::tests::Recorder,
        tests::{fixture, object_id},
    };

    async fn resolve(args: Value, options: UpdateResolverOptions) -> (Result<Value>, Vec<Value>) {
        let graph = fixture();
        let resolver = UpdateResolver::new(&graph, object_id(&graph), Recorder::default(), options).unwrap();
        let document = async_graphql_parser::parse_query("mutation { objects { _id stringScalar } }").unwrap();
        let info = ResolveInfo::from_document(&document, "objects");

        let output = resolver
            .resolve(&(), args.as_object().unwrap(), &"updated".to_string(), &info)
            .await;

        (output, resolver.callback().recorded())
    }

    #[tokio::test]
    async fn upsert_with_merged_set() {
        let args = json!({
            "filter": {"_id": {"EQ": "1"}},
            "update": {
                "setOnInsert": {"nonNullScalar": "a", "nonNullList": []},
                "set": {"intScalar": 2},
                "inc": {"floatScalar": 0.5}
            }
        });
        let options = UpdateResolverOptions {
            validate_update_args: true,
            excluded_fields: vec!["_id".into()],
            ..Default::default()
        };

        let (output, queries) = resolve(args, options).await;

        assert_eq!(output.unwrap(), json!("updated"));
        assert_eq!(
            queries,
            [json!({
                "filter": {"_id": {"$eq": "1"}},
                "update": {
                    "$setOnInsert": {"nonNullScalar": "a", "nonNullList": []},
                    "$set": {"intScalar": 2},
                    "$inc": {"floatScalar": 0.5}
                },
                "options": {"upsert": true},
                "projection": {"stringScalar": 1}
            })]
        );
    }

    #[tokio::test]
    async fn validation_aborts_before_the_store() {
        let args = json!({"filter": {}, "update": {"set": {"nonNullScalar": null}}});
        let options = UpdateResolverOptions {
            validate_update_args: true,
            ..Default::default()
        };

        let (output, queries) = resolve(args, options).await;

        let error = output.unwrap_err();
        insta::assert_snapshot!(error, @r###"Non-nullable field "nonNullScalar" is set to null"###);
        assert!(queries.is_empty());
    }

    #[tokio::test]
    async fn overwrite_nests_set_objects() {
        let args = json!({"filter": {}, "update": {"set": {"nested": {"intScalar": 2}}}});
        let options = UpdateResolverOptions {
            overwrite: true,
            different_output_type: true,
            ..Default::default()
        };

        let (_, queries) = resolve(args, options).await;

        assert_eq!(
            queries,
            [json!({
                "filter": {},
                "update": {"$set": {"nested": {"intScalar": 2}}},
                "options": {},
                "projection": null
            })]
        );
    }

    #[tokio::test]
    async fn update_argument_is_required() {
        let (output, queries) = resolve(json!({"filter": {}}), UpdateResolverOptions::default()).await;

        insta::assert_snapshot!(output.unwrap_err(), @"Invalid argument at 'update': expected an object");
        assert!(queries.is_empty());
    }
}
