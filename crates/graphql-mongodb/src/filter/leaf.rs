use itertools::Itertools;
use serde_json::{json, Value};

use super::{legacy, operators::LeafOperator};
use crate::{diagnostics::Diagnostics, Error, JsonMap, Result};

/// Compiles the operators of a scalar or enum field filter.
pub(super) fn compile_leaf(filter: &JsonMap, path: &str, diagnostics: &Diagnostics) -> Result<JsonMap> {
    let filter = legacy::normalize(filter, path, diagnostics)?;
    compile_operators(&filter, path)
}

fn compile_operators(filter: &JsonMap, path: &str) -> Result<JsonMap> {
    let mut document = JsonMap::new();

    for (key, value) in filter {
        let operator = key
            .parse::<LeafOperator>()
            .map_err(|_| Error::invalid_argument(path, format!("unknown filter operator {key}")))?;

        match operator {
            // Only meaningful next to REGEX.
            LeafOperator::Options => {}
            LeafOperator::Regex => {
                document.insert(operator.native().to_string(), value.clone());
                if let Some(options) = filter.get(LeafOperator::Options.as_ref()).filter(|options| !options.is_null()) {
                    document.insert(LeafOperator::Options.native().to_string(), options.clone());
                }
            }
            LeafOperator::Not => match value {
                Value::Null => {
                    document.insert(operator.native().to_string(), Value::Null);
                }
                Value::Object(negated) => {
                    if let Some(negation) = compile_negation(negated, path)? {
                        document.insert(operator.native().to_string(), negation);
                    }
                }
                _ => return Err(Error::invalid_argument(path, "NOT must be an object")),
            },
            _ => {
                document.insert(operator.native().to_string(), value.clone());
            }
        }
    }

    Ok(document)
}

/// A `NOT` holds either a regular expression or plain operators, never both.
fn compile_negation(filter: &JsonMap, path: &str) -> Result<Option<Value>> {
    let regex = filter
        .get(LeafOperator::Regex.as_ref())
        .filter(|regex| !regex.is_null());

    let Some(regex) = regex else {
        let operators = compile_operators(filter, path)?;
        return Ok((!operators.is_empty()).then_some(Value::Object(operators)));
    };

    let mixed = filter.iter().any(|(key, value)| {
        !value.is_null() && key != LeafOperator::Regex.as_ref() && key != LeafOperator::Options.as_ref()
    });
    if mixed {
        return Err(Error::NotRegexCombination { path: path.to_string() });
    }

    let Value::String(pattern) = regex else {
        return Err(Error::invalid_argument(path, "REGEX must be a string"));
    };

    let options = match filter.get(LeafOperator::Options.as_ref()) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(options)) => options.chars().sorted().dedup().collect(),
        Some(_) => return Err(Error::invalid_argument(path, "OPTIONS must be a string")),
    };

    Ok(Some(regular_expression(pattern, &options)))
}

/// A BSON regular expression in extended JSON. Canonical form wants the options sorted.
fn regular_expression(pattern: &str, options: &str) -> Value {
    json!({
        "$regularExpression": {
            "pattern": pattern,
            "options": options,
        }
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn compile(filter: Value) -> Result<Value> {
        let filter = filter.as_object().unwrap().clone();
        compile_leaf(&filter, "field", &Diagnostics::default()).map(Value::Object)
    }

    #[rstest]
    #[case("EQ", json!("a"), "$eq")]
    #[case("GT", json!(5), "$gt")]
    #[case("GTE", json!(5), "$gte")]
    #[case("IN", json!([1, 2]), "$in")]
    #[case("LT", json!(5.5), "$lt")]
    #[case("LTE", json!(5), "$lte")]
    #[case("NE", json!("b"), "$ne")]
    #[case("NIN", json!(["c"]), "$nin")]
    fn single_operator(#[case] operator: &str, #[case] operand: Value, #[case] native: &str) {
        let mut filter = JsonMap::new();
        filter.insert(operator.to_string(), operand.clone());

        let mut expected = JsonMap::new();
        expected.insert(native.to_string(), operand);

        assert_eq!(compile(Value::Object(filter)).unwrap(), Value::Object(expected));
    }

    #[test]
    fn regex_with_options() {
        assert_eq!(
            compile(json!({"REGEX": "^a", "OPTIONS": "i"})).unwrap(),
            json!({"$regex": "^a", "$options": "i"})
        );
        assert_eq!(compile(json!({"OPTIONS": "i"})).unwrap(), json!({}));
    }

    #[test]
    fn negated_regex() {
        assert_eq!(
            compile(json!({"NOT": {"REGEX": "x", "OPTIONS": "mi"}})).unwrap(),
            json!({"$not": {"$regularExpression": {"pattern": "x", "options": "im"}}})
        );
        assert_eq!(
            compile(json!({"NOT": {"REGEX": "x", "OPTIONS": "xsix"}})).unwrap(),
            json!({"$not": {"$regularExpression": {"pattern": "x", "options": "isx"}}})
        );
        assert_eq!(
            compile(json!({"NOT": {"REGEX": "x"}})).unwrap(),
            json!({"$not": {"$regularExpression": {"pattern": "x", "options": ""}}})
        );
    }

    #[test]
    fn negated_operators() {
        assert_eq!(
            compile(json!({"GT": 1, "NOT": {"EQ": 5, "IN": [7, 8]}})).unwrap(),
            json!({"$gt": 1, "$not": {"$eq": 5, "$in": [7, 8]}})
        );
    }

    #[test]
    fn negated_regex_mixed_with_operators() {
        let error = compile(json!({"NOT": {"REGEX": "x", "EQ": "y"}})).unwrap_err();

        assert!(matches!(error, Error::NotRegexCombination { ref path } if path == "field"));
    }

    #[test]
    fn null_operands_are_kept() {
        assert_eq!(
            compile(json!({"EQ": null, "GT": 3})).unwrap(),
            json!({"$eq": null, "$gt": 3})
        );
        assert_eq!(compile(json!({"NE": null})).unwrap(), json!({"$ne": null}));
        assert_eq!(compile(json!({"OPTIONS": null})).unwrap(), json!({}));
    }

    #[test]
    fn legacy_null_value_is_kept() {
        assert_eq!(
            compile(json!({"opr": "$eq", "value": null})).unwrap(),
            json!({"$eq": null})
        );
        assert_eq!(compile(json!({"opr": "EQL"})).unwrap(), json!({}));
    }

    #[test]
    fn unknown_operator() {
        let error = compile(json!({"LIKE": "%a%"})).unwrap_err();
        insta::assert_snapshot!(error, @"Invalid argument at 'field': unknown filter operator LIKE");
    }
}
