//! The merge loop.

use serde_json::Value;

use crate::error::MergeError;
use crate::item::{children_mut, Item};
use crate::marker::NamePolicy;
use crate::ops::{from_json_operations, SemanticOp};
use crate::tree::{ensure_path, strip_markers, upsert_request};

/// Apply `ops` to `root`, each path prefixed with `base_path`.
///
/// The tree is taken by value: on error it is dropped, so callers never see
/// a half-merged document. Keep a clone if the input is still needed.
///
/// Every marker in the tree is stripped first. Afterwards only the nodes
/// addressed by this run (the final folder of each path, and each upserted
/// request) carry the marker again.
pub fn apply_operations(
    mut root: Item,
    ops: &[SemanticOp],
    base_path: &[String],
    policy: &dyn NamePolicy,
) -> Result<Item, MergeError> {
    let node = root.node_mut();
    strip_markers(node, policy);
    children_mut(node)?;

    for (index, op) in ops.iter().enumerate() {
        let full_path: Vec<String> = base_path.iter().chain(op.path()).cloned().collect();
        let _span = tracing::debug_span!("semantic_op", index, kind = op.kind_name()).entered();
        match op {
            SemanticOp::Folder { .. } => {
                ensure_path(node, &full_path, policy)?;
            }
            SemanticOp::Request { spec, .. } => {
                let folder = ensure_path(node, &full_path, policy)?;
                upsert_request(folder, spec, policy).map_err(|e| match e {
                    MergeError::MissingName { .. } => MergeError::MissingName {
                        folder: full_path.join("/"),
                    },
                    other => other,
                })?;
            }
        }
    }
    tracing::info!(operations = ops.len(), "merge applied");
    Ok(root)
}

/// JSON-in, JSON-out form of [`apply_operations`].
pub fn merge_document(
    doc: Value,
    ops: &[Value],
    base_path: &[String],
    policy: &dyn NamePolicy,
) -> Result<Value, MergeError> {
    let ops = from_json_operations(ops)?;
    let root = Item::from_value(doc)?;
    Ok(apply_operations(root, &ops, base_path, policy)?.into_value())
}
