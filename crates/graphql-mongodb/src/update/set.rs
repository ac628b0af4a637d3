use serde_json::Value;

use super::{overwrite_marker, OverwriteMode, OVERWRITE};
use crate::{path::join_path, JsonMap, Result};

/// Compiles a set object. Children that resolve to overwrite are nested as whole documents,
/// the others are merged through dot paths.
pub(super) fn compile_set(set: &JsonMap, mode: OverwriteMode, path: &str) -> Result<JsonMap> {
    let (_, document) = compile_object(set, mode, path)?;
    Ok(document)
}

fn compile_object(object: &JsonMap, mode: OverwriteMode, path: &str) -> Result<(bool, JsonMap)> {
    let overwrite = mode.resolve(overwrite_marker(object, path)?);
    let children = OverwriteMode::inherited(overwrite);

    let mut document = JsonMap::new();

    for (key, value) in object {
        if key == OVERWRITE {
            continue;
        }

        match value {
            Value::Object(child) if !is_extended_json(child) => {
                let (child_overwrite, compiled) = compile_object(child, children, &join_path(path, key))?;

                if child_overwrite {
                    document.insert(key.clone(), Value::Object(compiled));
                } else {
                    document.extend(
                        compiled
                            .into_iter()
                            .map(|(child_key, value)| (join_path(key, &child_key), value)),
                    );
                }
            }
            _ => {
                document.insert(key.clone(), value.clone());
            }
        }
    }

    Ok((overwrite, document))
}

/// Dates and other BSON values arrive as `{ "$date": ... }` and are set as they are.
fn is_extended_json(object: &JsonMap) -> bool {
    object.len() == 1 && object.keys().all(|key| key.starts_with('$'))
}
