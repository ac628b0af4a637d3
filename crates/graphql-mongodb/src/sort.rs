use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::{path::join_path, Error, JsonMap, Result};

/// Placeholder field of sort types that would otherwise have no field.
pub const FICTIVE_SORT: &str = "_FICTIVE_SORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn value(self) -> i64 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Flattens the `sort` argument into a `{ "dot.path": 1 | -1 }` document.
///
/// Directions may be given as the `SortType` names or as their numeric values.
pub fn compile_sort(sort: Option<&Value>) -> Result<JsonMap> {
    let mut document = JsonMap::new();

    match sort {
        None | Some(Value::Null) => {}
        Some(Value::Object(sort)) => flatten_sort(sort, "", &mut document)?,
        Some(_) => return Err(Error::invalid_argument("", "the sort must be an object")),
    }

    Ok(document)
}

fn flatten_sort(sort: &JsonMap, path: &str, document: &mut JsonMap) -> Result<()> {
    for (key, value) in sort {
        if key == FICTIVE_SORT {
            continue;
        }

        let path = join_path(path, key);

        let direction = match value {
            Value::Null => continue,
            Value::Object(nested) => {
                flatten_sort(nested, &path, document)?;
                continue;
            }
            Value::Number(number) => match number.as_i64() {
                Some(direction @ (1 | -1)) => direction,
                _ => return Err(Error::invalid_argument(&path, "sort direction must be 1 or -1")),
            },
            Value::String(name) => name
                .parse::<SortDirection>()
                .map_err(|_| Error::invalid_argument(&path, format!("unknown sort direction {name}")))?
                .value(),
            _ => return Err(Error::invalid_argument(&path, "unexpected sort value")),
        };

        document.insert(path, Value::from(direction));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn compile(sort: Value) -> Value {
        Value::Object(compile_sort(Some(&sort)).unwrap())
    }

    #[test]
    fn flattens_nested_fields() {
        assert_eq!(
            compile(json!({"intScalar": 1, "nested": {"stringScalar": -1, "recursive": {"floatScalar": 1}}})),
            json!({"intScalar": 1, "nested.stringScalar": -1, "nested.recursive.floatScalar": 1})
        );
    }

    #[test]
    fn accepts_direction_names() {
        assert_eq!(
            compile(json!({"a": "ASC", "b": {"c": "DESC"}})),
            json!({"a": 1, "b.c": -1})
        );
    }

    #[test]
    fn skips_placeholder_and_empty_objects() {
        assert_eq!(
            compile(json!({"_FICTIVE_SORT": 1, "nested": {"_FICTIVE_SORT": -1}, "other": {}})),
            json!({})
        );
    }

    #[test]
    fn rejects_invalid_directions() {
        let error = compile_sort(Some(&json!({"a": {"b": 2}}))).unwrap_err();
        insta::assert_snapshot!(error, @"Invalid argument at 'a.b': sort direction must be 1 or -1");
    }
}
