//! Upsert folders and requests into a collection tree by name path.
//!
//! Nodes are addressed by human-readable names rather than positions:
//! `["Auth", "Tokens"]` is the `Tokens` folder inside the `Auth` folder,
//! wherever they sit. Names are compared through a [`NamePolicy`], which lets
//! a node tagged as machine-managed (`"Auth [AI]"`) be found again as `Auth`.
//!
//! ```
//! use collection_merge::{merge_document, SuffixMarker};
//! use serde_json::json;
//!
//! let ops = [
//!     json!({"kind": "folder", "path": ["Auth"]}),
//!     json!({"kind": "request", "path": ["Auth"], "name": "Login", "method": "POST"}),
//! ];
//! let doc = merge_document(json!({}), &ops, &[], &SuffixMarker::default()).unwrap();
//! assert_eq!(doc["item"][0]["name"], "Auth [AI]");
//! assert_eq!(doc["item"][0]["item"][0]["request"]["method"], "POST");
//! ```

pub mod apply;
pub mod error;
pub mod item;
pub mod marker;
pub mod ops;
pub mod tree;

pub use apply::{apply_operations, merge_document};
pub use error::MergeError;
pub use item::{Item, Node, RequestPayload};
pub use marker::{NamePolicy, SuffixMarker, Unmarked, DEFAULT_MARKER};
pub use ops::{from_json, from_json_operations, RequestSpec, SemanticOp};
