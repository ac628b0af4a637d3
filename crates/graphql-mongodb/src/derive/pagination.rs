use super::DerivationContext;
use crate::{
    registry::{InputObjectType, InputValueType, MetaInputValue},
    Result,
};

const PAGINATION_TYPE: &str = "PaginationType";

impl DerivationContext<'_> {
    /// The shared `PaginationType` input, `{ limit: Int, skip: Int }`.
    pub fn pagination_type(&mut self) -> Result<InputValueType> {
        self.create_type(PAGINATION_TYPE, |_| {
            Ok(InputObjectType::new(
                PAGINATION_TYPE,
                [MetaInputValue::new("limit", "Int"), MetaInputValue::new("skip", "Int")],
            )
            .into())
        })
    }
}
