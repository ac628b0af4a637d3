//! Normalizes the deprecated `opr`/`value`/`values`/`NEQ` leaf filter shape.

use std::borrow::Cow;

use serde_json::Value;

use super::operators::{LeafOperator, LegacyOperator};
use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    Error, JsonMap, Result,
};

const LEGACY_KEYS: [&str; 4] = ["opr", "value", "values", "NEQ"];

/// Rewrites a legacy leaf filter into operator fields, borrowing when there is nothing to do.
pub(super) fn normalize<'a>(filter: &'a JsonMap, path: &str, diagnostics: &Diagnostics) -> Result<Cow<'a, JsonMap>> {
    if !filter.keys().any(|key| LEGACY_KEYS.contains(&key.as_str())) {
        return Ok(Cow::Borrowed(filter));
    }

    diagnostics.warn_once(Diagnostic::DeprecatedLeafFilter);

    let mut normalized = JsonMap::new();

    for (key, value) in filter {
        match key.as_str() {
            "opr" | "value" | "values" => {}
            "NEQ" => {
                if !filter.contains_key(LeafOperator::Ne.as_ref()) {
                    normalized.insert(LeafOperator::Ne.to_string(), value.clone());
                }
            }
            _ => {
                normalized.insert(key.clone(), value.clone());
            }
        }
    }

    let operator = match filter.get("opr") {
        None | Some(Value::Null) => return Ok(Cow::Owned(normalized)),
        Some(Value::String(operator)) => LegacyOperator::parse(operator)
            .ok_or_else(|| Error::invalid_argument(path, format!("unknown opr value {operator}")))?
            .operator(),
        Some(_) => return Err(Error::invalid_argument(path, "opr must be a string")),
    };

    let operand = if operator.takes_list() {
        filter.get("values").filter(|values| !values.is_null())
    } else {
        filter.get("value")
    };

    if let Some(operand) = operand {
        normalized
            .entry(operator.to_string())
            .or_insert_with(|| operand.clone());
    }

    Ok(Cow::Owned(normalized))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::diagnostics::tests::RecordingSink;

    fn normalize_json(filter: Value) -> Value {
        let filter = filter.as_object().unwrap().clone();
        let diagnostics = Diagnostics::default();
        Value::Object(normalize(&filter, "field", &diagnostics).unwrap().into_owned())
    }

    #[test]
    fn value_operand() {
        assert_eq!(normalize_json(json!({"opr": "$gt", "value": 5})), json!({"GT": 5}));
        assert_eq!(normalize_json(json!({"opr": "EQL", "value": null})), json!({"EQ": null}));
    }

    #[test]
    fn values_operand() {
        assert_eq!(
            normalize_json(json!({"opr": "$in", "value": 1, "values": [1, 2]})),
            json!({"IN": [1, 2]})
        );
        assert_eq!(normalize_json(json!({"opr": "NIN", "value": 1})), json!({}));
    }

    #[test]
    fn neq_alias() {
        assert_eq!(normalize_json(json!({"NEQ": "a", "GT": "b"})), json!({"NE": "a", "GT": "b"}));
    }

    #[test]
    fn explicit_operators_win() {
        assert_eq!(
            normalize_json(json!({"opr": "$eq", "value": 1, "EQ": 2})),
            json!({"EQ": 2})
        );
    }

    #[test]
    fn warns_once() {
        let sink = Arc::new(RecordingSink::default());
        let diagnostics = Diagnostics::new(sink.clone());
        let legacy = json!({"opr": "$eq", "value": 1}).as_object().unwrap().clone();
        let current = json!({"EQ": 1}).as_object().unwrap().clone();

        normalize(&current, "a", &diagnostics).unwrap();
        normalize(&legacy, "a", &diagnostics).unwrap();
        normalize(&legacy, "b", &diagnostics).unwrap();

        assert_eq!(sink.recorded(), [Diagnostic::DeprecatedLeafFilter]);
    }

    #[test]
    fn unknown_operator() {
        let legacy = json!({"opr": "$exists", "value": true}).as_object().unwrap().clone();
        let error = normalize(&legacy, "a", &Diagnostics::default()).unwrap_err();

        insta::assert_snapshot!(error, @"Invalid argument at 'a': unknown opr value $exists");
    }
}
