//! Pointer patching for collection documents.
//!
//! A deliberately small subset of RFC 6902: `add`, `replace` and `remove`.
//! Patches are applied to a deep copy of the input, so a failed patch never
//! leaves a half-written document behind.
//!
//! ```
//! use collection_patch::{apply_patch, from_json_patch};
//! use serde_json::json;
//!
//! let doc = json!({"info": {"name": "API"}});
//! let ops = from_json_patch(&json!([
//!     {"op": "add", "path": "/item/0", "value": {"name": "Auth", "item": []}}
//! ])).unwrap();
//! let next = apply_patch(&doc, &ops).unwrap();
//! assert_eq!(next["item"][0]["name"], "Auth");
//! assert!(doc.get("item").is_none());
//! ```
//!
//! # Known limitation
//!
//! Missing intermediate containers are created by peeking at the following
//! step: a canonical non-negative integer produces an array, anything else an
//! object. A numeric-looking object key under a parent that does not exist yet
//! therefore creates an array.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{apply_op, apply_ops, apply_patch};
pub use codec::{from_json, from_json_patch};
pub use types::{Op, PatchError, Path};
