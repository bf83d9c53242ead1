//! Collection tree nodes, read and written in place.
//!
//! A node is a JSON object. The engine reads `name` and `item` and writes
//! `name`, `item`, `request` and `response`; every other key is left as
//! found, in its original position. A `name` that is not a string is
//! treated as no name at all and is never rewritten.

use serde_json::{Map, Value};

use crate::error::MergeError;

/// One folder, request leaf, or the collection root.
pub type Node = Map<String, Value>;

pub const NAME: &str = "name";
pub const ITEM: &str = "item";
pub const REQUEST: &str = "request";
pub const RESPONSE: &str = "response";

/// `null`, `false`, `0` and `""` count as unset, as they do in the
/// operation files this engine consumes.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn name_of(node: &Node) -> Option<&str> {
    node.get(NAME).and_then(Value::as_str)
}

/// Overwrite `name`, keeping the key where it already sits.
pub fn set_name(node: &mut Node, name: String) {
    node.insert(NAME.to_string(), Value::String(name));
}

/// Children of a folder; empty when `item` is missing or not an array.
pub fn children(node: &Node) -> &[Value] {
    node.get(ITEM)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// The `item` array, created when it is unset.
///
/// # Errors
///
/// [`MergeError::Document`] when `item` holds something other than an
/// array.
pub fn children_mut(node: &mut Node) -> Result<&mut Vec<Value>, MergeError> {
    let label = name_of(node).unwrap_or_default().to_string();
    let slot = node.entry(ITEM).or_insert(Value::Null);
    if !is_set(slot) {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(MergeError::Document(format!(
            "\"item\" of \"{label}\" must be an array, found {other}"
        ))),
    }
}

/// `{"name", "item": []}`
pub fn new_folder(name: &str) -> Value {
    let mut node = Node::new();
    node.insert(NAME.into(), Value::String(name.to_string()));
    node.insert(ITEM.into(), Value::Array(Vec::new()));
    Value::Object(node)
}

/// `{"name", "request", "response": []}`
pub fn new_request(name: String, payload: RequestPayload) -> Value {
    let mut node = Node::new();
    node.insert(NAME.into(), Value::String(name));
    node.insert(REQUEST.into(), payload.into_value());
    node.insert(RESPONSE.into(), Value::Array(Vec::new()));
    Value::Object(node)
}

/// A whole collection tree, owned.
///
/// The root is a [`Node`] like any other; it usually has no `name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    node: Node,
}

impl Item {
    pub fn from_value(value: Value) -> Result<Self, MergeError> {
        match value {
            Value::Object(node) => Ok(Item { node }),
            other => Err(MergeError::Document(format!(
                "collection root must be an object, found {other}"
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.node)
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    pub fn children(&self) -> &[Value] {
        children(&self.node)
    }
}

impl From<Node> for Item {
    fn from(node: Node) -> Self {
        Item { node }
    }
}

/// The request payload written on upsert.
///
/// Fields are carried as given; only the defaults are filled in. It always
/// replaces the leaf's previous payload wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub method: Value,
    pub header: Value,
    pub url: Option<Value>,
    pub description: Value,
    pub body: Option<Value>,
}

impl RequestPayload {
    pub fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert("method".into(), self.method);
        map.insert("header".into(), self.header);
        if let Some(url) = self.url {
            map.insert("url".into(), url);
        }
        map.insert("description".into(), self.description);
        if let Some(body) = self.body {
            map.insert("body".into(), body);
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_keeps_key_order_and_nulls() {
        let text = r#"{"info":{"name":"API"},"item":[{"event":[],"name":null,"item":null,"id":3},{"x":1,"name":5}],"variable":[]}"#;
        let item = Item::from_value(serde_json::from_str(text).unwrap()).unwrap();
        assert_eq!(serde_json::to_string(&item.into_value()).unwrap(), text);
    }

    #[test]
    fn non_string_name_reads_as_absent() {
        let node = json!({"name": 5}).as_object().cloned().unwrap();
        assert_eq!(name_of(&node), None);
    }

    #[test]
    fn children_mut_fills_unset_item() {
        for unset in [json!(null), json!(false), json!("")] {
            let mut node = json!({"name": "F", "item": unset, "id": 1}).as_object().cloned().unwrap();
            children_mut(&mut node).unwrap().push(json!({"name": "x"}));
            assert_eq!(Value::Object(node), json!({"name": "F", "item": [{"name": "x"}], "id": 1}));
        }
    }

    #[test]
    fn children_mut_rejects_object_item() {
        let mut node = json!({"name": "F", "item": {"name": "x"}}).as_object().cloned().unwrap();
        assert!(matches!(children_mut(&mut node), Err(MergeError::Document(_))));
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(Item::from_value(json!([])), Err(MergeError::Document(_))));
    }

    #[test]
    fn set_name_keeps_position() {
        let mut node = json!({"id": 1, "name": "Login", "request": {}}).as_object().cloned().unwrap();
        set_name(&mut node, "Login [AI]".into());
        let keys: Vec<_> = node.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "request"]);
    }

    #[test]
    fn request_leaf_shape() {
        let leaf = new_request(
            "Login".into(),
            RequestPayload {
                method: json!("POST"),
                header: json!([]),
                url: Some(json!("https://x/login")),
                description: json!(""),
                body: None,
            },
        );
        assert_eq!(
            leaf,
            json!({
                "name": "Login",
                "request": {"method": "POST", "header": [], "url": "https://x/login", "description": ""},
                "response": []
            })
        );
    }

    #[test]
    fn set_values() {
        for unset in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            assert!(!is_set(&unset), "{unset}");
        }
        for set in [json!(true), json!(1), json!("x"), json!([]), json!({})] {
            assert!(is_set(&set), "{set}");
        }
    }
}
