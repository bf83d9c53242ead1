//! JSON Pointer (RFC 6901) handling for collection documents.
//!
//! A pointer names a location by structural position: `/item/0/name` is the
//! `name` of the first entry in the root `item` array. Steps are kept as
//! strings; whether a step is an index depends on the container it meets.
//!
//! ```
//! use collection_pointer::{decode_pointer, encode_pointer, get};
//! use serde_json::json;
//!
//! let path = decode_pointer("item/0/name").unwrap();
//! assert_eq!(encode_pointer(&path), "/item/0/name");
//!
//! let doc = json!({"item": [{"name": "Auth"}]});
//! assert_eq!(get(&doc, &path), Some(&json!("Auth")));
//! ```

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must start with '/'")]
    MissingSlash,
}

/// Parsed pointer: one unescaped string per step.
pub type Path = Vec<String>;

/// `~1` to `/`, then `~0` to `~`. The order matters: `~01` is `~1`.
pub fn unescape_step(step: &str) -> Cow<'_, str> {
    if step.contains('~') {
        Cow::Owned(step.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(step)
    }
}

pub fn escape_step(step: &str) -> Cow<'_, str> {
    if step.contains(['~', '/']) {
        Cow::Owned(step.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(step)
    }
}

/// Strict RFC 6901 parse: `""` is the root, anything else must start with `/`
/// and `"/"` is the single empty key.
///
/// # Errors
///
/// [`PointerError::MissingSlash`] for a non-empty pointer without the
/// leading `/`.
pub fn parse_pointer(pointer: &str) -> Result<Path, PointerError> {
    if pointer.is_empty() {
        return Ok(Path::new());
    }
    let rest = pointer.strip_prefix('/').ok_or(PointerError::MissingSlash)?;
    Ok(rest.split('/').map(|s| unescape_step(s).into_owned()).collect())
}

/// Whether the pointer names the whole document. A lone `"/"` counts.
pub fn is_root_pointer(pointer: &str) -> bool {
    matches!(pointer, "" | "/")
}

/// Parse a pointer as written in patch files.
///
/// The leading `/` is optional and `""` and `"/"` both mean the root. There
/// is no limit on length or depth.
///
/// ```
/// use collection_pointer::decode_pointer;
///
/// assert_eq!(decode_pointer("/").unwrap(), Vec::<String>::new());
/// assert_eq!(decode_pointer("info/name").unwrap(), vec!["info", "name"]);
/// assert_eq!(decode_pointer("/a~1b").unwrap(), vec!["a/b"]);
/// ```
pub fn decode_pointer(pointer: &str) -> Result<Path, PointerError> {
    if is_root_pointer(pointer) {
        return Ok(Path::new());
    }
    match pointer.strip_prefix('/') {
        Some(_) => parse_pointer(pointer),
        None => parse_pointer(&format!("/{pointer}")),
    }
}

/// Inverse of [`parse_pointer`]; the empty path encodes as `""`.
pub fn encode_pointer(path: &[String]) -> String {
    path.iter().fold(String::new(), |mut out, step| {
        out.push('/');
        out.push_str(&escape_step(step));
        out
    })
}

/// `0`, or a digit string without a leading zero.
pub fn is_valid_index(step: &str) -> bool {
    match step.as_bytes() {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// The step as an array index; `None` when not canonical or too large.
pub fn parse_index(step: &str) -> Option<usize> {
    is_valid_index(step).then(|| step.parse().ok()).flatten()
}

/// Look up `path`. Array steps must be canonical indices; `-` never resolves.
pub fn get<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, step| match node {
        Value::Object(map) => map.get(step),
        Value::Array(items) => items.get(parse_index(step)?),
        _ => None,
    })
}

pub fn get_mut<'a>(doc: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    path.iter().try_fold(doc, |node, step| match node {
        Value::Object(map) => map.get_mut(step),
        Value::Array(items) => items.get_mut(parse_index(step)?),
        _ => None,
    })
}
