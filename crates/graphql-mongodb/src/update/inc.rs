use serde_json::Value;

use super::FICTIVE_INC;
use crate::{path::join_path, Error, JsonMap, Result};

pub(super) fn compile_inc(inc: &JsonMap) -> Result<JsonMap> {
    let mut document = JsonMap::new();
    flatten_inc(inc, "", &mut document)?;
    Ok(document)
}

fn flatten_inc(inc: &JsonMap, path: &str, document: &mut JsonMap) -> Result<()> {
    for (key, value) in inc {
        if key == FICTIVE_INC {
            continue;
        }

        let path = join_path(path, key);

        match value {
            Value::Null => {}
            Value::Number(_) => {
                document.insert(path, value.clone());
            }
            Value::Object(nested) => flatten_inc(nested, &path, document)?,
            _ => return Err(Error::invalid_argument(&path, "increments must be numbers")),
        }
    }

    Ok(())
}
