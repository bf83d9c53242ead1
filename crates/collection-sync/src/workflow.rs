//! The three workflows: get, update (replace or patch) and semantic merge.
//!
//! Inputs are decoded before anything is fetched, so a malformed patch or
//! operations file fails without touching the store.

use std::path::Path;

use collection_merge::{apply_operations, from_json_operations, Item, MergeError, NamePolicy};
use collection_patch::{apply_patch, from_json_patch};
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::SyncError;
use crate::io::{read_json, write_json};
use crate::store::{fetch_document, CollectionStore};

/// Fetch the collection, writing it to `out` if given. Returns the stored
/// value unchanged.
pub fn get(store: &dyn CollectionStore, out: Option<&Path>) -> Result<Value, SyncError> {
    let fetched = store.fetch()?;
    if let Some(out) = out {
        write_json(out, &fetched)?;
        tracing::info!(out = %out.display(), "saved collection");
    }
    Ok(fetched)
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions<'a> {
    pub input: &'a Path,
    /// Treat `input` as a JSON Patch instead of a full replacement.
    pub patch: bool,
    pub out: Option<&'a Path>,
}

/// Replace the collection with `input`, or apply `input` as a patch to the
/// current one. Returns the store's response.
pub fn update(store: &dyn CollectionStore, options: UpdateOptions<'_>) -> Result<Value, SyncError> {
    let input = read_json(options.input)?;
    let next = if options.patch {
        let ops = from_json_patch(&input)?;
        let current = fetch_document(store)?;
        apply_patch(&current, &ops)?
    } else {
        Envelope::detect(input).into_document()
    };
    if let Some(out) = options.out {
        write_json(out, &Envelope::wrap(next.clone()))?;
    }
    tracing::info!(store = %store.describe(), patch = options.patch, "updating collection");
    store.replace(&next)
}

/// Contents of an operations file: `{"operations": [...], "base": [...]}`
/// or a bare array of operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationsFile {
    pub operations: Vec<Value>,
    pub base: Option<Vec<String>>,
}

impl OperationsFile {
    pub fn from_value(value: Value) -> Result<Self, SyncError> {
        match value {
            Value::Array(operations) => Ok(OperationsFile {
                operations,
                base: None,
            }),
            Value::Object(mut map) => {
                let operations = match map.shift_remove("operations") {
                    Some(Value::Array(ops)) => ops,
                    _ => {
                        tracing::warn!("operations file has no operations array");
                        Vec::new()
                    }
                };
                let base = match map.shift_remove("base") {
                    Some(Value::Array(segments)) => Some(base_segments(segments)?),
                    _ => None,
                };
                Ok(OperationsFile { operations, base })
            }
            _ => {
                tracing::warn!("operations file is neither an object nor an array");
                Ok(OperationsFile::default())
            }
        }
    }
}

fn base_segments(segments: Vec<Value>) -> Result<Vec<String>, SyncError> {
    segments
        .into_iter()
        .map(|segment| match segment {
            Value::String(s) => Ok(s),
            other => Err(SyncError::Merge(MergeError::Path(format!(
                "base segment must be a string, got {other}"
            )))),
        })
        .collect()
}

/// `"a/b"` to `["a", "b"]`; empty segments are dropped.
pub fn parse_base(base: &str) -> Vec<String> {
    base.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct MergeOptions<'a> {
    pub ops: &'a Path,
    /// Used when the operations file carries no `base` of its own.
    pub base: Option<Vec<String>>,
    pub out: Option<&'a Path>,
    pub policy: &'a dyn NamePolicy,
}

/// Apply a semantic operations file to the current collection and upload
/// the result.
pub fn merge(store: &dyn CollectionStore, options: MergeOptions<'_>) -> Result<Value, SyncError> {
    let file = OperationsFile::from_value(read_json(options.ops)?)?;
    let ops = from_json_operations(&file.operations)?;
    let base = file.base.or(options.base).unwrap_or_default();

    let current = Item::from_value(fetch_document(store)?)?;
    let merged = apply_operations(current, &ops, &base, options.policy)?.into_value();

    if let Some(out) = options.out {
        write_json(out, &Envelope::wrap(merged.clone()))?;
    }
    tracing::info!(
        store = %store.describe(),
        operations = ops.len(),
        base = %base.join("/"),
        "uploading merged collection"
    );
    store.replace(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ops_file_object_form() {
        let file = OperationsFile::from_value(json!({
            "operations": [{"kind": "folder", "path": ["A"]}],
            "base": ["Root", "Sub"]
        }))
        .unwrap();
        assert_eq!(file.operations.len(), 1);
        assert_eq!(file.base, Some(vec!["Root".to_string(), "Sub".to_string()]));
    }

    #[test]
    fn ops_file_array_form() {
        let file = OperationsFile::from_value(json!([{"kind": "folder", "path": []}])).unwrap();
        assert_eq!(file.operations.len(), 1);
        assert_eq!(file.base, None);
    }

    #[test]
    fn ops_file_without_operations_is_empty() {
        assert_eq!(
            OperationsFile::from_value(json!({"base": "nope"})).unwrap(),
            OperationsFile::default()
        );
        assert_eq!(OperationsFile::from_value(json!(7)).unwrap(), OperationsFile::default());
    }

    #[test]
    fn non_string_base_is_rejected() {
        let err = OperationsFile::from_value(json!({"operations": [], "base": ["a", 1]})).unwrap_err();
        assert!(matches!(err, SyncError::Merge(MergeError::Path(_))));
    }

    #[test]
    fn base_argument_splits_on_slash() {
        assert_eq!(parse_base("Team/API"), vec!["Team", "API"]);
        assert_eq!(parse_base("/Team//API/"), vec!["Team", "API"]);
        assert!(parse_base("").is_empty());
    }
}
