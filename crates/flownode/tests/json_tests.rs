/// serde / serde_json bridge tests.
use flownode::{ArrayNode, Node, ObjectNode};
use serde_json::{json, Value};

// ============================================================================
// Value -> Node
// ============================================================================

#[test]
fn numbers_pick_narrowest_kind() {
    assert_eq!(Node::from(json!(7)), Node::Int(7));
    assert_eq!(Node::from(json!(-2147483648i64)), Node::Int(i32::MIN));
    assert_eq!(Node::from(json!(2147483648i64)), Node::Long(2_147_483_648));
    assert_eq!(Node::from(json!(1.5)), Node::Double(1.5));
    assert_eq!(Node::from(json!(u64::MAX)), Node::Double(u64::MAX as f64));
}

#[test]
fn converts_nested_document() {
    let node = Node::from(json!({
        "name": "Ada",
        "tags": ["math", null, true],
        "address": { "city": "London" }
    }));

    let object = node.as_object().unwrap();
    assert_eq!(object.get("name"), &Node::text("Ada"));
    let tags = object.get("tags").as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags.get(1).is_null());
    assert_eq!(
        object.get("address").as_object().unwrap().get("city"),
        &Node::text("London")
    );
}

// ============================================================================
// Node -> Value
// ============================================================================

#[test]
fn missing_and_non_finite_become_null() {
    assert_eq!(Value::from(&Node::Missing), Value::Null);
    assert_eq!(Value::from(&Node::Double(f64::NAN)), Value::Null);
    assert_eq!(Value::from(&Node::Double(f64::INFINITY)), Value::Null);
}

#[test]
fn converts_containers_to_value() {
    let mut object = ObjectNode::new();
    object
        .put("list", ArrayNode::from(vec![Node::Int(1), Node::Long(2)]))
        .put("flag", false);
    assert_eq!(
        Value::from(&Node::from(object)),
        json!({ "flag": false, "list": [1, 2] })
    );
}

// ============================================================================
// serde
// ============================================================================

#[test]
fn serializes_through_serde_json() {
    let mut object = ObjectNode::new();
    object.put("b", 2).put("a", "x");
    let text = serde_json::to_string(&Node::from(object)).unwrap();
    assert_eq!(text, r#"{"a":"x","b":2}"#);
}

#[test]
fn deserializes_through_serde_json() {
    let node: Node = serde_json::from_str(r#"{"n": [1, 2.5, "s"], "z": null}"#).unwrap();
    let mut expected = ObjectNode::new();
    expected
        .put("n", vec![Node::Int(1), Node::Double(2.5), Node::text("s")])
        .put("z", Node::Null);
    assert_eq!(node, Node::from(expected));
}

#[test]
fn value_round_trip_is_lossless_for_finite_documents() {
    let value = json!({ "a": [1, -9000000000i64, 0.25, "t", false, null], "b": {} });
    assert_eq!(Value::from(&Node::from(value.clone())), value);
}
