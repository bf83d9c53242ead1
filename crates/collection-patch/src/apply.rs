//! Patch apply logic.

use collection_pointer::{encode_pointer, get_mut, is_valid_index, parse_index};
use serde_json::{Map, Value};

use super::types::{Op, PatchError};

// ── Path navigation ───────────────────────────────────────────────────────

/// Empty container to create in front of `next_step`.
fn container_for(next_step: &str) -> Value {
    if is_valid_index(next_step) {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Array slot addressed by `step`: an existing index, or `len` for append.
fn array_slot(arr: &[Value], step: &str) -> Option<usize> {
    if step == "-" {
        return Some(arr.len());
    }
    parse_index(step).filter(|&idx| idx <= arr.len())
}

/// Walk to the parent of the last step, creating missing containers.
fn resolve_parent_or_create<'a>(
    doc: &'a mut Value,
    path: &[String],
) -> Result<&'a mut Value, PatchError> {
    let mut current = doc;
    for (i, step) in path[..path.len() - 1].iter().enumerate() {
        let next = &path[i + 1];
        current = match current {
            Value::Object(map) => map.entry(step.clone()).or_insert_with(|| {
                tracing::trace!(step = %step, "creating intermediate container");
                container_for(next)
            }),
            Value::Array(arr) => {
                let idx = array_slot(arr, step).ok_or_else(|| {
                    PatchError::path(path, format!("invalid array index \"{step}\""))
                })?;
                if idx == arr.len() {
                    arr.push(container_for(next));
                }
                &mut arr[idx]
            }
            _ => {
                return Err(PatchError::path(
                    path,
                    format!("cannot traverse a scalar at \"{step}\""),
                ))
            }
        };
    }
    Ok(current)
}

// ── Individual operation applicators ─────────────────────────────────────

/// Shared by `add` and `replace`: both write `value` at the final step.
fn apply_set(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    let Some(key) = path.last() else {
        return Err(PatchError::path(path, "cannot write to document root"));
    };
    let parent = resolve_parent_or_create(doc, path)?;
    match parent {
        Value::Object(map) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let idx = array_slot(arr, key)
                .ok_or_else(|| PatchError::path(path, format!("invalid array index \"{key}\"")))?;
            if idx == arr.len() {
                arr.push(value);
            } else {
                arr[idx] = value;
            }
            Ok(())
        }
        _ => Err(PatchError::path(path, "parent is not a container")),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        return Err(PatchError::path(path, "cannot remove document root"));
    };
    let parent =
        get_mut(doc, parent_path).ok_or_else(|| PatchError::path(path, "path not found"))?;
    let removed = match parent {
        Value::Array(arr) => {
            let idx = parse_index(key)
                .ok_or_else(|| PatchError::path(path, format!("invalid array index \"{key}\"")))?;
            (idx < arr.len()).then(|| arr.remove(idx))
        }
        Value::Object(map) => map.shift_remove(key),
        _ => return Err(PatchError::path(path, "parent is not a container")),
    };
    if removed.is_none() {
        tracing::debug!(pointer = %encode_pointer(path), "remove target already absent");
    }
    Ok(())
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply one operation in place.
///
/// On error the document may already hold containers created while resolving
/// the pointer; use [`apply_patch`] when the input has to stay untouched.
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<(), PatchError> {
    match op {
        Op::Add { path, value } | Op::Replace { path, value } => {
            apply_set(doc, path, value.clone())
        }
        Op::Remove { path } => apply_remove(doc, path),
    }
}

/// Apply operations in order, stopping at the first failure.
pub fn apply_ops(doc: &mut Value, ops: &[Op]) -> Result<(), PatchError> {
    for (index, op) in ops.iter().enumerate() {
        tracing::debug!(
            index,
            op = op.op_name(),
            pointer = %encode_pointer(op.path()),
            "applying patch operation"
        );
        apply_op(doc, op)?;
    }
    Ok(())
}

/// Apply a patch to a deep copy of `doc` and return the copy.
///
/// `doc` is never modified, whether or not the patch succeeds.
pub fn apply_patch(doc: &Value, ops: &[Op]) -> Result<Value, PatchError> {
    let mut working = doc.clone();
    apply_ops(&mut working, ops)?;
    tracing::info!(operations = ops.len(), "patch applied");
    Ok(working)
}

// ── Tests ─────────────────────────────────────────────────────────────────
