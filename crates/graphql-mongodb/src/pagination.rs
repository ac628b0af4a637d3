use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, JsonMap, Result};

/// The `pagination` argument of query fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl Pagination {
    /// Reads the `pagination` entry of the field arguments, if any.
    pub fn from_args(args: &JsonMap) -> Result<Option<Pagination>> {
        match args.get("pagination") {
            None | Some(Value::Null) => Ok(None),
            Some(pagination) => Pagination::deserialize(pagination)
                .map(Some)
                .map_err(|error| Error::invalid_argument("pagination", error.to_string())),
        }
    }
}

/// Options of a find operation. Absent and zero values are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FindOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
}

impl FindOptions {
    pub fn new(sort: JsonMap, pagination: Option<Pagination>) -> Self {
        let pagination = pagination.unwrap_or_default();

        FindOptions {
            sort: Some(sort).filter(|sort| !sort.is_empty()),
            limit: pagination.limit.filter(|limit| *limit != 0),
            skip: pagination.skip.filter(|skip| *skip != 0),
        }
    }
}
