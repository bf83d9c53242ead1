//! Traversal primitives over a collection tree.

use serde_json::Value;

use crate::error::MergeError;
use crate::item::{children_mut, name_of, new_folder, new_request, set_name, Node, ITEM, NAME, REQUEST};
use crate::marker::NamePolicy;
use crate::ops::RequestSpec;

/// Strip the marker from every string name in the tree, root included.
pub fn strip_markers(node: &mut Node, policy: &dyn NamePolicy) {
    if let Some(Value::String(name)) = node.get_mut(NAME) {
        let logical = policy.normalize(name);
        if logical.len() != name.len() {
            *name = logical.to_string();
        }
    }
    if let Some(Value::Array(children)) = node.get_mut(ITEM) {
        for child in children.iter_mut().filter_map(Value::as_object_mut) {
            strip_markers(child, policy);
        }
    }
}

/// Index of the first object child whose name matches `name` after
/// normalization. A child without a string name matches only `""`.
pub fn find_child(children: &[Value], name: &str, policy: &dyn NamePolicy) -> Option<usize> {
    children.iter().position(|child| {
        child
            .as_object()
            .is_some_and(|node| policy.same_name(name_of(node).unwrap_or_default(), name))
    })
}

/// Walk `path` from `root`, appending empty folders for missing segments.
///
/// The node at the end of the path gets the marker; intermediate folders are
/// resolved but not re-tagged.
pub fn ensure_path<'a>(
    root: &'a mut Node,
    path: &[String],
    policy: &dyn NamePolicy,
) -> Result<&'a mut Node, MergeError> {
    let mut current = root;
    for segment in path {
        let children = children_mut(current)?;
        let idx = match find_child(children, segment, policy) {
            Some(idx) => idx,
            None => {
                tracing::debug!(folder = %segment, "creating folder");
                children.push(new_folder(segment));
                children.len() - 1
            }
        };
        current = children[idx]
            .as_object_mut()
            .ok_or_else(|| MergeError::Document(format!("\"{segment}\" is not an object")))?;
    }
    if let Some(Value::String(name)) = current.get_mut(NAME) {
        *name = policy.tag(name);
    }
    Ok(current)
}

/// Create or overwrite a request leaf inside `folder`; returns its index.
///
/// An existing leaf keeps its position, its other keys and its `response`
/// history; its `request` is replaced as a whole.
pub fn upsert_request(
    folder: &mut Node,
    spec: &RequestSpec,
    policy: &dyn NamePolicy,
) -> Result<usize, MergeError> {
    let name = spec.name.as_deref().ok_or_else(|| MergeError::MissingName {
        folder: name_of(folder).unwrap_or_default().to_string(),
    })?;
    let payload = spec.payload();
    let children = children_mut(folder)?;
    match find_child(children, name, policy) {
        Some(idx) => {
            tracing::debug!(request = %name, "updating request");
            if let Some(leaf) = children[idx].as_object_mut() {
                let tagged = policy.tag(name_of(leaf).filter(|n| !n.is_empty()).unwrap_or(name));
                set_name(leaf, tagged);
                leaf.insert(REQUEST.to_string(), payload.into_value());
            }
            Ok(idx)
        }
        None => {
            tracing::debug!(request = %name, "creating request");
            children.push(new_request(policy.tag(name), payload));
            Ok(children.len() - 1)
        }
    }
}
