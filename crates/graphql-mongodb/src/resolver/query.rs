use async_trait::async_trait;
use serde::Serialize;
use tracing::Instrument;

use super::{options::excluded, FieldContext, QueryOptions};
use crate::{
    filter::compile_filter,
    graph::{CompositeId, TypeGraph},
    pagination::{FindOptions, Pagination},
    projection::{compile_projection, ResolveInfo},
    sort::compile_sort,
    Error, JsonMap, Result,
};

/// Everything a store needs to run a find.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindQuery {
    pub filter: JsonMap,
    /// `None` when the field does not return documents of the queried type.
    pub projection: Option<JsonMap>,
    pub options: FindOptions,
}

#[async_trait]
pub trait QueryCallback: Send + Sync {
    type Source: Sync;
    type Context: Sync;
    type Output: Send;
    type Error: From<Error> + Send;

    async fn find(
        &self,
        query: FindQuery,
        field: FieldContext<'_, Self::Source, Self::Context>,
    ) -> Result<Self::Output, Self::Error>;
}

/// Resolves query fields returning documents of one type.
pub struct QueryResolver<'g, C> {
    graph: &'g TypeGraph,
    ty: CompositeId,
    callback: C,
    options: QueryOptions,
}

impl<'g, C: QueryCallback> QueryResolver<'g, C> {
    pub fn new(graph: &'g TypeGraph, ty: CompositeId, callback: C, options: QueryOptions) -> Result<Self> {
        graph.composite(ty)?;

        Ok(QueryResolver {
            graph,
            ty,
            callback,
            options,
        })
    }

    pub fn options(&self) -> &QueryOptions {
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
        let span = tracing::debug_span!("query_resolver", ty);

        async move {
            let query = self.compile(args, info)?;
            tracing::debug!(filter_keys = query.filter.len(), "Calling the find callback");

            let field = FieldContext {
                source,
                args,
                context,
                info,
            };
            self.callback.find(query, field).await
        }
        .instrument(span)
        .await
    }

    fn compile(&self, args: &JsonMap, info: &ResolveInfo<'_>) -> Result<FindQuery> {
        let filter = compile_filter(self.graph, self.ty, args.get("filter"))?;

        let projection = if self.options.different_output_type {
            None
        } else {
            Some(compile_projection(
                self.graph,
                self.ty,
                info,
                &excluded(&self.options.excluded_fields),
                self.options.is_resolved_field.get(),
            )?)
        };

        let sort = compile_sort(args.get("sort"))?;
        let options = FindOptions::new(sort, Pagination::from_args(args)?);

        Ok(FindQuery {
            filter,
            projection,
            options,
        })
    }
}
