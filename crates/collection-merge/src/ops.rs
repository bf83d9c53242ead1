//! Semantic operations and their JSON decoding.
//!
//! Wire form:
//!
//! ```json
//! {"kind": "folder", "path": ["Auth"]}
//! {"kind": "request", "path": ["Auth"], "name": "Login", "method": "POST", "url": "https://x/login"}
//! ```
//!
//! `type` is accepted in place of `kind`. Request fields may also come from a
//! nested `request` object (`name`, `method`, `header`, `url`, `description`,
//! `body`); a set top-level field wins. The payload values themselves are
//! opaque: headers may be an array or an object, a url may be a string or a
//! structured object, and so on. A nested `request` that is not an object
//! supplies nothing.

use serde_json::{Map, Value};

use crate::error::MergeError;
use crate::item::{is_set, RequestPayload};

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticOp {
    /// Make sure the folder at `path` exists.
    Folder { path: Vec<String> },
    /// Create or overwrite the request `spec.name` inside the folder at `path`.
    Request { path: Vec<String>, spec: RequestSpec },
}

impl SemanticOp {
    pub fn path(&self) -> &[String] {
        match self {
            SemanticOp::Folder { path } | SemanticOp::Request { path, .. } => path,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SemanticOp::Folder { .. } => "folder",
            SemanticOp::Request { .. } => "request",
        }
    }
}

/// Request fields after top-level/nested fallback has been resolved.
/// `None` means unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    pub name: Option<String>,
    pub method: Option<Value>,
    pub headers: Option<Value>,
    pub url: Option<Value>,
    pub description: Option<Value>,
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Payload with defaults filled in: `GET`, no headers, empty description.
    pub fn payload(&self) -> RequestPayload {
        RequestPayload {
            method: self
                .method
                .clone()
                .unwrap_or_else(|| Value::String("GET".into())),
            header: self
                .headers
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            url: self.url.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| Value::String(String::new())),
            body: self.body.clone(),
        }
    }
}

/// First set value among `op[key]` and `nested[nested_key]`.
fn pick(op: &Map<String, Value>, nested: Option<&Map<String, Value>>, key: &str, nested_key: &str) -> Option<Value> {
    op.get(key)
        .filter(|v| is_set(v))
        .or_else(|| nested?.get(nested_key).filter(|v| is_set(v)))
        .cloned()
}

fn request_name(value: Option<Value>) -> Result<Option<String>, MergeError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(MergeError::InvalidOperation(format!(
            "request name must be a string, got {other}"
        ))),
    }
}

fn decode_request(op: &Map<String, Value>) -> Result<RequestSpec, MergeError> {
    let nested = op.get("request").and_then(Value::as_object);
    Ok(RequestSpec {
        name: request_name(pick(op, nested, "name", "name"))?,
        method: pick(op, nested, "method", "method"),
        headers: pick(op, nested, "headers", "header"),
        url: pick(op, nested, "url", "url"),
        description: pick(op, nested, "description", "description"),
        body: pick(op, nested, "body", "body"),
    })
}

/// An unset path is the root; otherwise it must be an array of strings.
fn decode_path(op: &Map<String, Value>) -> Result<Vec<String>, MergeError> {
    match op.get("path").filter(|v| is_set(v)) {
        None => Ok(Vec::new()),
        Some(Value::Array(steps)) => steps
            .iter()
            .map(|step| {
                step.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| MergeError::Path(format!("path segment {step} is not a string")))
            })
            .collect(),
        Some(_) => Err(MergeError::Path("op.path must be an array".into())),
    }
}

/// Decode one operation. The kind is checked first.
pub fn from_json(v: &Value) -> Result<SemanticOp, MergeError> {
    let obj = v
        .as_object()
        .ok_or_else(|| MergeError::InvalidOperation("operation must be an object".into()))?;
    let kind = pick(obj, None, "kind", "")
        .or_else(|| pick(obj, None, "type", ""))
        .unwrap_or(Value::Null);
    match kind.as_str() {
        Some("folder") => Ok(SemanticOp::Folder {
            path: decode_path(obj)?,
        }),
        Some("request") => Ok(SemanticOp::Request {
            path: decode_path(obj)?,
            spec: decode_request(obj)?,
        }),
        Some(other) => Err(MergeError::UnsupportedOperation(other.to_string())),
        None => Err(MergeError::UnsupportedOperation(kind.to_string())),
    }
}

/// Decode a list of operations, failing on the first bad one.
pub fn from_json_operations(ops: &[Value]) -> Result<Vec<SemanticOp>, MergeError> {
    ops.iter().map(from_json).collect()
}
