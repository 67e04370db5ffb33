//! Sanitizing untrusted values against a structure.
//!
//! Every function here is total over runtime data: bad values are dropped
//! or coerced, never reported as errors. Only [`validate_value`] can fail,
//! and only when asked to validate a container as a scalar.

use super::error::ValidationError;
use super::validator::{get_type_validation, registered};
use crate::structure::{Structure, StructureNode};
use serde_json::{Map, Value};
use tracing::debug;

/// Validate a scalar value.
///
/// Returns `Ok(Some(value))` when the value is accepted and `Ok(None)` when
/// it should be dropped.
pub fn validate_value(structure: &Structure, value: &Value) -> Result<Option<Value>, ValidationError> {
    let node = structure.resolve();
    let validator = get_type_validation(&node)?;
    if validator.check(value) {
        Ok(Some(value.clone()))
    } else {
        report_drop(&node, value);
        Ok(None)
    }
}

/// Validate every element of an array, compacting out rejected elements.
///
/// `structure` is normally an `arrayOf` node; any other node is used as the
/// element structure directly. Non-array input yields an empty array.
pub fn validate_array(structure: &Structure, input: &Value) -> Vec<Value> {
    let Value::Array(items) = input else {
        return Vec::new();
    };

    let node = structure.resolve_inner();
    let element = match node.as_ref() {
        StructureNode::ArrayOf { element, .. } => element.clone(),
        _ => structure.clone(),
    };

    items
        .iter()
        .filter_map(|item| conform(&element, item))
        .collect()
}

/// Validate an object against a shape.
///
/// Keys are resolved exact-match first, then against the wildcard; keys that
/// match neither are stripped. Container children given a non-container
/// value are coerced to an empty container, while scalar children given a
/// bad value lose the key entirely. No key absent from `input` is added.
pub fn validate_shape(structure: &Structure, input: &Value) -> Value {
    let mut output = Map::new();
    let Value::Object(entries) = input else {
        return Value::Object(output);
    };

    let wildcard = has_wildcard_key(structure);
    for (key, value) in entries {
        let Some(child) = get_value_type(structure, key, wildcard) else {
            continue;
        };
        let node = child.resolve_inner();
        let sanitized = match node.as_ref() {
            StructureNode::Shape { .. } => Some(validate_shape(&child, value)),
            StructureNode::ArrayOf { .. } => Some(Value::Array(validate_array(&child, value))),
            scalar => conform_scalar(scalar, value),
        };
        if let Some(sanitized) = sanitized {
            output.insert(key.clone(), sanitized);
        }
    }
    Value::Object(output)
}

/// Whether the structure is a shape declaring a wildcard entry.
pub fn has_wildcard_key(structure: &Structure) -> bool {
    matches!(
        structure.resolve_inner().as_ref(),
        StructureNode::Shape {
            wildcard: Some(_),
            ..
        }
    )
}

/// Resolve the child structure responsible for `key`.
///
/// An exact match always wins; the wildcard is consulted only when
/// `has_wildcard` is set and no child carries that name.
pub fn get_value_type(structure: &Structure, key: &str, has_wildcard: bool) -> Option<Structure> {
    let node = structure.resolve_inner();
    let StructureNode::Shape {
        children, wildcard, ..
    } = node.as_ref()
    else {
        return None;
    };

    children
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, child)| child.clone())
        .or_else(|| {
            if has_wildcard {
                wildcard.clone()
            } else {
                None
            }
        })
}

/// Sanitize a value of any structure kind; `None` means "drop it".
///
/// Containers handed a value of the wrong container type are rejected here.
/// Shape children get coercion instead, in [`validate_shape`].
pub(crate) fn conform(structure: &Structure, value: &Value) -> Option<Value> {
    let node = structure.resolve_inner();
    match node.as_ref() {
        StructureNode::Shape { .. } => value.is_object().then(|| validate_shape(structure, value)),
        StructureNode::ArrayOf { .. } => value
            .is_array()
            .then(|| Value::Array(validate_array(structure, value))),
        scalar => conform_scalar(scalar, value),
    }
}

fn conform_scalar(node: &StructureNode, value: &Value) -> Option<Value> {
    let validator = registered(node)?;
    if validator.check(value) {
        Some(value.clone())
    } else {
        report_drop(node, value);
        None
    }
}

fn report_drop(node: &StructureNode, value: &Value) {
    match node {
        StructureNode::Custom { error_message, .. } => {
            debug!(message = %error_message, value = %value, "Custom validation rejected value");
        }
        _ => {
            debug!(expected = %node.type_tag(), value = %value, "Dropped value of wrong type");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{
        any, array_of, boolean, custom, number, reducer, shape, string, wildcard_key, ShapeKey,
        TypeTag,
    };
    use serde_json::json;

    #[test]
    fn validate_value_keeps_matching_values() {
        assert_eq!(validate_value(&string(), &json!("a")), Ok(Some(json!("a"))));
        assert_eq!(validate_value(&number(), &json!(1.5)), Ok(Some(json!(1.5))));
        assert_eq!(validate_value(&boolean(), &json!(true)), Ok(Some(json!(true))));
    }

    #[test]
    fn validate_value_drops_mismatches() {
        assert_eq!(validate_value(&string(), &json!(1)), Ok(None));
        assert_eq!(validate_value(&number(), &json!("1")), Ok(None));
        assert_eq!(validate_value(&boolean(), &Value::Null), Ok(None));
    }

    #[test]
    fn any_accepts_everything() {
        for value in [json!(null), json!(1), json!("x"), json!([1]), json!({"a": 1})] {
            assert_eq!(validate_value(&any(), &value), Ok(Some(value.clone())));
        }
    }

    #[test]
    fn validate_value_rejects_container_structures() {
        let result = validate_value(&shape(vec![("a", string())]), &json!({}));
        assert_eq!(
            result,
            Err(ValidationError::UnknownType {
                tag: TypeTag::Shape
            })
        );
    }

    #[test]
    fn validate_array_returns_empty_for_non_arrays() {
        let structure = array_of(number());
        assert_eq!(validate_array(&structure, &json!("nope")), Vec::<Value>::new());
        assert_eq!(validate_array(&structure, &json!({"0": 1})), Vec::<Value>::new());
        assert_eq!(validate_array(&structure, &Value::Null), Vec::<Value>::new());
    }

    #[test]
    fn validate_array_compacts_rejected_elements() {
        let structure = array_of(number());
        let output = validate_array(&structure, &json!([1, "two", 3, null, 4]));
        assert_eq!(output, vec![json!(1), json!(3), json!(4)]);
    }

    #[test]
    fn validate_array_sanitizes_shape_elements() {
        let structure = array_of(shape(vec![("id", number())]));
        let output = validate_array(&structure, &json!([{"id": 1, "x": 2}, "bad", {"id": "2"}]));
        assert_eq!(output, vec![json!({"id": 1}), json!({})]);
    }

    #[test]
    fn validate_shape_coerces_mismatched_containers() {
        let structure = shape(vec![
            ("test1", shape(vec![("test2", string())])),
            ("test2", string()),
        ]);
        let output = validate_shape(&structure, &json!({"test1": "foo", "test2": "bar"}));
        assert_eq!(output, json!({"test1": {}, "test2": "bar"}));
    }

    #[test]
    fn validate_shape_coerces_arrays() {
        let structure = shape(vec![("list", array_of(string()))]);
        let output = validate_shape(&structure, &json!({"list": 5}));
        assert_eq!(output, json!({"list": []}));
    }

    #[test]
    fn validate_shape_drops_bad_scalars_and_unknown_keys() {
        let structure = shape(vec![("name", string()), ("age", number())]);
        let output = validate_shape(&structure, &json!({"name": 1, "age": 30, "extra": true}));
        assert_eq!(output, json!({"age": 30}));
    }

    #[test]
    fn validate_shape_never_invents_keys() {
        let structure = shape(vec![("name", string().with_default(json!("x"))), ("age", number())]);
        assert_eq!(validate_shape(&structure, &json!({})), json!({}));
    }

    #[test]
    fn validate_shape_non_object_input_is_empty() {
        let structure = shape(vec![("name", string())]);
        assert_eq!(validate_shape(&structure, &json!("x")), json!({}));
        assert_eq!(validate_shape(&structure, &json!([1])), json!({}));
    }

    #[test]
    fn wildcard_matches_only_unlisted_keys() {
        let structure = shape(vec![
            (ShapeKey::from("fixed"), string()),
            (wildcard_key(), number()),
        ]);
        let output = validate_shape(
            &structure,
            &json!({"fixed": "a", "dyn1": 1, "dyn2": "not a number"}),
        );
        assert_eq!(output, json!({"fixed": "a", "dyn1": 1}));

        // "fixed" must satisfy its own structure, not the wildcard's.
        let output = validate_shape(&structure, &json!({"fixed": 7}));
        assert_eq!(output, json!({}));
    }

    #[test]
    fn lookup_helpers() {
        let structure = shape(vec![
            (ShapeKey::from("a"), string()),
            (wildcard_key(), boolean()),
        ]);
        assert!(has_wildcard_key(&structure));
        assert!(!has_wildcard_key(&shape(vec![("a", string())])));
        assert!(!has_wildcard_key(&string()));

        let exact = get_value_type(&structure, "a", true).unwrap();
        assert_eq!(exact.type_tag(), TypeTag::String);
        let wild = get_value_type(&structure, "zzz", true).unwrap();
        assert_eq!(wild.type_tag(), TypeTag::Boolean);
        assert!(get_value_type(&structure, "zzz", false).is_none());
        assert!(get_value_type(&string(), "a", true).is_none());
    }

    #[test]
    fn custom_child_drops_key_on_failure() {
        let structure = shape(vec![(
            "email",
            custom(|v| v.as_str().is_some_and(|s| s.contains('@')), "not an email"),
        )]);
        assert_eq!(
            validate_shape(&structure, &json!({"email": "a@b"})),
            json!({"email": "a@b"})
        );
        assert_eq!(validate_shape(&structure, &json!({"email": "ab"})), json!({}));
    }

    #[test]
    fn boundaries_are_transparent_to_validation() {
        let structure = shape(vec![("inner", reducer(shape(vec![("x", number())])))]);
        let output = validate_shape(&structure, &json!({"inner": {"x": 1, "y": 2}}));
        assert_eq!(output, json!({"inner": {"x": 1}}));
    }

    #[test]
    fn deferred_structures_resolve_on_demand() {
        fn node() -> Structure {
            shape(vec![
                ("value", number()),
                ("children", array_of(Structure::lazy(node))),
            ])
        }
        let input = json!({
            "value": 1,
            "children": [{"value": 2, "children": [{"value": "bad"}]}, 3]
        });
        let output = validate_shape(&node(), &input);
        assert_eq!(
            output,
            json!({"value": 1, "children": [{"value": 2, "children": [{}]}]})
        );
    }
}
