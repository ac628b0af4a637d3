use super::DerivationContext;
use crate::{graph::CompositeId, registry::MetaInputValue, Result};

impl DerivationContext<'_> {
    /// Arguments of a query field returning `id`: `filter`, `sort` and `pagination`.
    pub fn query_args(&mut self, id: CompositeId, excluded: &[&str]) -> Result<Vec<MetaInputValue>> {
        Ok(vec![
            MetaInputValue::new("filter", self.filter_type(id, excluded)?),
            MetaInputValue::new("sort", self.sort_type(id, excluded)?),
            MetaInputValue::new("pagination", self.pagination_type()?),
        ])
    }

    /// Arguments of an update field on `id`, both required: `filter` and `update`.
    pub fn update_args(&mut self, id: CompositeId, excluded: &[&str]) -> Result<Vec<MetaInputValue>> {
        Ok(vec![
            MetaInputValue::new("filter", self.filter_type(id, excluded)?.non_null()),
            MetaInputValue::new("update", self.update_type(id, excluded)?.non_null()),
        ])
    }
}
