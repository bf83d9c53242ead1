//! JSON codec for patch operations.
//!
//! Wire form is the RFC 6902 shape `{"op", "path", "value"}`; `kind` and
//! `pointer` are accepted as aliases.

use collection_pointer::decode_pointer;
use serde_json::{Map, Value};

use crate::types::{Op, PatchError, Path};

// ── Path helpers ──────────────────────────────────────────────────────────

fn decode_path(v: Option<&Value>) -> Result<Path, PatchError> {
    let invalid = |pointer: &str, reason: String| PatchError::Path {
        pointer: pointer.to_string(),
        reason,
    };
    match v {
        Some(Value::String(s)) => decode_pointer(s).map_err(|e| invalid(s, e.to_string())),
        Some(_) => Err(invalid("", "path must be a string".into())),
        None => Err(invalid("", "missing 'path' field".into())),
    }
}

fn take_value(obj: &Map<String, Value>, op: &str) -> Result<Value, PatchError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires 'value'")))
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one operation.
///
/// The operation name is checked before the path, so an unknown `op`
/// reports [`PatchError::UnsupportedOperation`] even when the rest of the
/// object is malformed.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;
    let op_str = obj
        .get("op")
        .or_else(|| obj.get("kind"))
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("missing 'op' field".into()))?;
    let path = || decode_path(obj.get("path").or_else(|| obj.get("pointer")));

    match op_str {
        "add" => Ok(Op::Add {
            path: path()?,
            value: take_value(obj, op_str)?,
        }),
        "replace" => Ok(Op::Replace {
            path: path()?,
            value: take_value(obj, op_str)?,
        }),
        "remove" => Ok(Op::Remove { path: path()? }),
        other => Err(PatchError::UnsupportedOperation(other.to_string())),
    }
}

/// Deserialize a patch (a JSON array of operations).
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_rfc_shape() {
        let op = from_json(&json!({"op": "replace", "path": "/info/name", "value": "API"})).unwrap();
        assert_eq!(
            op,
            Op::Replace { path: vec!["info".into(), "name".into()], value: json!("API") }
        );
    }

    #[test]
    fn decodes_aliases_and_relative_pointer() {
        let op = from_json(&json!({"kind": "remove", "pointer": "item/0"})).unwrap();
        assert_eq!(op, Op::Remove { path: vec!["item".into(), "0".into()] });
    }

    #[test]
    fn slash_is_root() {
        let op = from_json(&json!({"op": "add", "path": "/", "value": 1})).unwrap();
        assert!(op.path().is_empty());
    }

    #[test]
    fn unknown_op_is_unsupported() {
        let err = from_json(&json!({"kind": "teleport", "path": []})).unwrap_err();
        assert_eq!(err, PatchError::UnsupportedOperation("teleport".into()));
    }

    #[test]
    fn rfc_ops_outside_subset_are_unsupported() {
        for name in ["move", "copy", "test"] {
            let err = from_json(&json!({"op": name, "path": "/a", "from": "/b"})).unwrap_err();
            assert!(matches!(err, PatchError::UnsupportedOperation(_)), "{name}");
        }
    }

    #[test]
    fn missing_value_is_invalid() {
        let err = from_json(&json!({"op": "add", "path": "/a"})).unwrap_err();
        assert_eq!(err, PatchError::InvalidOp("add requires 'value'".into()));
    }

    #[test]
    fn non_string_path_is_path_error() {
        let err = from_json(&json!({"op": "remove", "path": ["a"]})).unwrap_err();
        assert!(matches!(err, PatchError::Path { .. }));
    }

    #[test]
    fn long_pointer_is_accepted() {
        let key = "x".repeat(2048);
        let op = from_json(&json!({"op": "remove", "path": format!("/{key}")})).unwrap();
        assert_eq!(op, Op::Remove { path: vec![key] });
    }

    #[test]
    fn patch_must_be_array() {
        assert!(from_json_patch(&json!({"op": "add"})).is_err());
        assert!(from_json_patch(&json!([])).unwrap().is_empty());
    }
}
