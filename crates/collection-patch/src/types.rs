//! Core types for pointer patching.

use collection_pointer::encode_pointer;
use serde_json::Value;
use thiserror::Error;

pub use collection_pointer::Path;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// Malformed or unresolvable pointer, including writes to the root and
    /// missing intermediates during `remove`.
    #[error("path error at \"{pointer}\": {reason}")]
    Path { pointer: String, reason: String },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("invalid operation: {0}")]
    InvalidOp(String),
}

impl PatchError {
    pub(crate) fn path(path: &[String], reason: impl Into<String>) -> Self {
        PatchError::Path {
            pointer: encode_pointer(path),
            reason: reason.into(),
        }
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A single patch operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: Path, value: Value },
    Replace { path: Path, value: Value },
    Remove { path: Path },
}

impl Op {
    /// Wire name of the operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Replace { .. } => "replace",
            Op::Remove { .. } => "remove",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. } | Op::Replace { path, .. } | Op::Remove { path } => path,
        }
    }
}
