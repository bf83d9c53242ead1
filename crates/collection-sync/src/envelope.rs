//! The `{"collection": ...}` wrapper used by the collection API.

use serde_json::{Map, Value};

/// Key under which a wrapped document sits.
pub const ENVELOPE_FIELD: &str = "collection";

/// A document as received: bare, or wrapped under `"collection"`.
///
/// Detected once when the value enters the program; everything past the
/// boundary works on the bare tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Bare(Value),
    Wrapped(Value),
}

impl Envelope {
    /// A value counts as wrapped when it is an object whose `collection`
    /// field holds an object.
    pub fn detect(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.get(ENVELOPE_FIELD).is_some_and(Value::is_object) => {
                match map.shift_remove(ENVELOPE_FIELD) {
                    Some(inner) => Envelope::Wrapped(inner),
                    None => Envelope::Bare(Value::Object(map)),
                }
            }
            other => Envelope::Bare(other),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Envelope::Wrapped(_))
    }

    pub fn into_document(self) -> Value {
        match self {
            Envelope::Bare(doc) | Envelope::Wrapped(doc) => doc,
        }
    }

    /// Wrap a bare document for upload or storage.
    pub fn wrap(document: Value) -> Value {
        let mut map = Map::new();
        map.insert(ENVELOPE_FIELD.to_string(), document);
        Value::Object(map)
    }
}

/// Unwrap-then-wrap, so an already wrapped value is not wrapped twice.
pub fn upload_payload(document: Value) -> Value {
    Envelope::wrap(Envelope::detect(document).into_document())
}
