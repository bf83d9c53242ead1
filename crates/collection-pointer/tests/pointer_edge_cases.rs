use collection_pointer::{decode_pointer, encode_pointer, get, parse_pointer, PointerError};
use serde_json::json;

#[test]
fn strict_slash_is_the_empty_key_but_decoded_slash_is_root() {
    let doc = json!({"": "value", "info": {"": "nested"}});
    assert_eq!(get(&doc, &parse_pointer("/").unwrap()), Some(&json!("value")));
    assert_eq!(get(&doc, &parse_pointer("/info/").unwrap()), Some(&json!("nested")));
    assert_eq!(get(&doc, &decode_pointer("/").unwrap()), Some(&doc));
}

#[test]
fn escaped_names_resolve() {
    let doc = json!({"users/{id}": {"~draft": {"method": "GET"}}});
    let path = decode_pointer("/users~1{id}/~0draft/method").unwrap();
    assert_eq!(path, vec!["users/{id}", "~draft", "method"]);
    assert_eq!(get(&doc, &path), Some(&json!("GET")));
}

#[test]
fn encode_then_decode_keeps_awkward_steps() {
    let steps = vec!["a/b".to_string(), "~".to_string(), "x".to_string(), "0".to_string()];
    assert_eq!(decode_pointer(&encode_pointer(&steps)).unwrap(), steps);
}

#[test]
fn relative_pointer_only_decodes_leniently() {
    assert_eq!(parse_pointer("item/2/name"), Err(PointerError::MissingSlash));
    assert_eq!(decode_pointer("item/2/name").unwrap(), vec!["item", "2", "name"]);
}

#[test]
fn leading_zero_is_not_an_index() {
    let doc = json!({"item": [10, 20]});
    assert_eq!(get(&doc, &decode_pointer("/item/1").unwrap()), Some(&json!(20)));
    assert_eq!(get(&doc, &decode_pointer("/item/01").unwrap()), None);
}
