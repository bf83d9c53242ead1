use collection_patch::{apply_patch, from_json_patch, Op, PatchError};
use proptest::prelude::*;
use serde_json::{json, Value};

fn patch(ops: Value) -> Vec<Op> {
    from_json_patch(&ops).unwrap()
}

fn collection() -> Value {
    json!({
        "info": {"name": "Shop API", "schema": "v2.1.0"},
        "item": [
            {"name": "Auth", "item": [
                {"name": "Login", "request": {"method": "POST", "url": "https://x/login"}, "response": []}
            ]},
            {"name": "Users", "item": []}
        ]
    })
}

#[test]
fn add_then_replace_equals_single_add() {
    let doc = collection();
    let twice = apply_patch(
        &doc,
        &patch(json!([
            {"op": "add", "path": "/info/version", "value": "1"},
            {"op": "replace", "path": "/info/version", "value": "2"}
        ])),
    )
    .unwrap();
    let once = apply_patch(
        &doc,
        &patch(json!([{"op": "add", "path": "/info/version", "value": "2"}])),
    )
    .unwrap();
    assert_eq!(twice, once);
}

#[test]
fn root_replace_is_rejected() {
    let doc = collection();
    let err = apply_patch(&doc, &patch(json!([{"kind": "replace", "pointer": "", "value": {}}])))
        .unwrap_err();
    assert!(matches!(err, PatchError::Path { .. }));
}

#[test]
fn array_remove_shifts_indices() {
    let doc = json!({"x": ["a", "b", "c"]});
    let next = apply_patch(&doc, &patch(json!([{"op": "remove", "path": "/x/1"}]))).unwrap();
    assert_eq!(next, json!({"x": ["a", "c"]}));
}

#[test]
fn nested_request_edit_by_pointer() {
    let doc = collection();
    let next = apply_patch(
        &doc,
        &patch(json!([
            {"op": "replace", "path": "/item/0/item/0/request/url", "value": "https://x/v2/login"},
            {"op": "add", "path": "/item/1/item/0", "value": {"name": "List users"}},
            {"op": "remove", "path": "/item/0/item/0/response"}
        ])),
    )
    .unwrap();
    assert_eq!(next["item"][0]["item"][0]["request"]["url"], "https://x/v2/login");
    assert_eq!(next["item"][1]["item"][0]["name"], "List users");
    assert!(next["item"][0]["item"][0].get("response").is_none());
    assert_eq!(doc, collection());
}

#[test]
fn escaped_keys_are_written_literally() {
    let doc = json!({"variable": {}});
    let next = apply_patch(
        &doc,
        &patch(json!([{"op": "add", "path": "/variable/base~1url", "value": "https://x"}])),
    )
    .unwrap();
    assert_eq!(next, json!({"variable": {"base/url": "https://x"}}));
}

#[test]
fn failure_midway_discards_earlier_ops() {
    let doc = collection();
    let ops = patch(json!([
        {"op": "add", "path": "/info/version", "value": "3"},
        {"op": "remove", "path": "/nope/deeper"}
    ]));
    assert!(apply_patch(&doc, &ops).is_err());
    assert!(doc["info"].get("version").is_none());
}

fn arb_op() -> impl Strategy<Value = Value> {
    let step = prop_oneof![
        Just("item".to_string()),
        Just("info".to_string()),
        Just("name".to_string()),
        Just("-".to_string()),
        (0usize..4).prop_map(|i| i.to_string()),
    ];
    let pointer = prop::collection::vec(step, 0..4).prop_map(|steps| {
        steps.iter().map(|s| format!("/{s}")).collect::<String>()
    });
    (prop_oneof![Just("add"), Just("replace"), Just("remove")], pointer, any::<i32>())
        .prop_map(|(op, path, n)| json!({"op": op, "path": path, "value": n}))
}

proptest! {
    #[test]
    fn prop_apply_never_mutates_input(ops in prop::collection::vec(arb_op(), 0..8)) {
        let doc = collection();
        let before = doc.clone();
        let ops = from_json_patch(&Value::Array(ops)).unwrap();
        let _ = apply_patch(&doc, &ops);
        prop_assert_eq!(doc, before);
    }
}
