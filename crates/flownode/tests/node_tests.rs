/// Node model tests: kinds, singletons, ordering, equality, text rendering and
/// scalar reuse copies.
use flownode::{ArrayNode, JsonNode, Kind, Node, NodeError, ObjectNode};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn sample_nodes() -> Vec<Node> {
    vec![
        Node::Null,
        Node::Missing,
        Node::Boolean(false),
        Node::Boolean(true),
        Node::Int(-3),
        Node::Int(7),
        Node::Long(i64::MIN),
        Node::Long(42),
        Node::Double(-0.5),
        Node::Double(2.25),
        Node::text(""),
        Node::text("abc"),
        Node::from(vec![Node::Int(1), Node::text("x")]),
        Node::from(ObjectNode::from_iter([("a", Node::Int(1))])),
    ]
}

// ============================================================================
// Kinds and singletons
// ============================================================================

#[test]
fn kind_matches_variant() {
    assert_eq!(Node::Null.kind(), Kind::Null);
    assert_eq!(Node::Missing.kind(), Kind::Missing);
    assert_eq!(Node::Boolean(true).kind(), Kind::Boolean);
    assert_eq!(Node::Int(1).kind(), Kind::Int);
    assert_eq!(Node::Long(1).kind(), Kind::Long);
    assert_eq!(Node::Double(1.0).kind(), Kind::Double);
    assert_eq!(Node::text("t").kind(), Kind::Text);
    assert_eq!(Node::Array(ArrayNode::new()).kind(), Kind::Array);
    assert_eq!(Node::Object(ObjectNode::new()).kind(), Kind::Object);
}

#[test]
fn singletons_are_shared_instances() {
    assert!(std::ptr::eq(Node::null(), Node::null()));
    assert!(std::ptr::eq(Node::missing(), Node::missing()));
    assert!(Node::null().is_null());
    assert!(Node::missing().is_missing());
}

#[test]
fn null_and_missing_are_distinct() {
    assert_ne!(Node::Null, Node::Missing);
    assert!(Node::Null.is_absent());
    assert!(Node::Missing.is_absent());
    assert!(!Node::Int(0).is_absent());
}

#[test]
fn empty_of_builds_every_storable_kind() {
    for kind in [
        Kind::Null,
        Kind::Missing,
        Kind::Boolean,
        Kind::Int,
        Kind::Long,
        Kind::Double,
        Kind::Text,
        Kind::Array,
        Kind::Object,
    ] {
        let node = Node::empty_of(kind).unwrap();
        assert_eq!(node.kind(), kind);
    }
    assert!(Node::empty_of(Kind::Stream).is_none());
}

#[test]
fn kind_tags_round_trip() {
    for tag in 0u8..=8 {
        let kind = Kind::from_tag(tag).unwrap();
        assert_eq!(kind.tag(), Some(tag));
    }
    assert_eq!(Kind::Stream.tag(), None);
    assert_eq!(Kind::from_tag(9), None);
    assert_eq!(Kind::from_tag(0xFF), None);
}

// ============================================================================
// Ordering and equality
// ============================================================================

#[test]
fn compare_equal_iff_eq() {
    let nodes = sample_nodes();
    for a in &nodes {
        for b in &nodes {
            assert_eq!(
                a.compare_to(b) == Ordering::Equal,
                a == b,
                "compare/eq disagree for {a} vs {b}"
            );
        }
    }
}

#[test]
fn equal_nodes_hash_equal() {
    for node in sample_nodes() {
        let copy = node.clone();
        assert_eq!(node, copy);
        assert_eq!(hash_of(&node), hash_of(&copy));
    }
}

#[test]
fn cross_kind_order_follows_kind_order() {
    assert_eq!(Node::Null.compare_to(&Node::Boolean(true)), Ordering::Less);
    assert_eq!(Node::text("a").compare_to(&Node::Int(99)), Ordering::Greater);
    assert_eq!(
        Node::Int(i32::MAX).compare_to(&Node::Long(i64::MIN)),
        Ordering::Less
    );
}

#[test]
fn compare_to_same_type_rejects_other_kinds() {
    let err = Node::Int(1)
        .compare_to_same_type(&Node::Long(1))
        .unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            expected: Kind::Int,
            found: Kind::Long,
        }
    );
}

#[test]
fn compare_to_same_type_orders_values() {
    assert_eq!(
        Node::Int(-1).compare_to_same_type(&Node::Int(1)).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        Node::text("b").compare_to_same_type(&Node::text("a")).unwrap(),
        Ordering::Greater
    );
    assert_eq!(
        Node::Boolean(false)
            .compare_to_same_type(&Node::Boolean(true))
            .unwrap(),
        Ordering::Less
    );
}

#[test]
fn doubles_use_total_order() {
    let nan = Node::Double(f64::NAN);
    assert_eq!(nan, nan.clone());
    assert_eq!(nan.compare_to(&nan.clone()), Ordering::Equal);
    assert_eq!(
        Node::Double(-0.0).compare_to(&Node::Double(0.0)),
        Ordering::Less
    );
    assert_ne!(Node::Double(-0.0), Node::Double(0.0));
    assert_eq!(
        Node::Double(f64::NEG_INFINITY).compare_to(&Node::Double(-1e300)),
        Ordering::Less
    );
}

#[test]
fn array_hash_is_order_sensitive() {
    let ab = Node::from(vec![Node::Int(1), Node::Int(2)]);
    let ba = Node::from(vec![Node::Int(2), Node::Int(1)]);
    assert_ne!(ab, ba);
    assert_ne!(hash_of(&ab), hash_of(&ba));
}

// ============================================================================
// Text rendering
// ============================================================================

#[test]
fn renders_scalars() {
    assert_eq!(Node::Null.to_string(), "null");
    assert_eq!(Node::Missing.to_string(), "<missing>");
    assert_eq!(Node::Boolean(true).to_string(), "true");
    assert_eq!(Node::Int(-12).to_string(), "-12");
    assert_eq!(Node::Long(9_000_000_000).to_string(), "9000000000");
    assert_eq!(Node::Double(1.0).to_string(), "1.0");
    assert_eq!(Node::Double(2.5).to_string(), "2.5");
}

#[test]
fn renders_text_as_escaped_literal() {
    assert_eq!(Node::text("hi").to_string(), r#""hi""#);
    assert_eq!(Node::text("a\"b\n").to_string(), r#""a\"b\n""#);
}

#[test]
fn renders_containers() {
    let mut object = ObjectNode::new();
    object
        .put("b", vec![Node::Boolean(true), Node::Null])
        .put("a", 1);
    assert_eq!(
        Node::from(object).to_string(),
        r#"{"a": 1, "b": [true, null]}"#
    );
    assert_eq!(Node::Array(ArrayNode::new()).to_string(), "[]");
    assert_eq!(Node::Object(ObjectNode::new()).to_string(), "{}");
}

// ============================================================================
// Scalar reuse copies
// ============================================================================

#[test]
fn copy_value_from_scalars() {
    let mut target = Node::Long(1);
    target.copy_value_from(&Node::Long(99)).unwrap();
    assert_eq!(target, Node::Long(99));

    let mut target = Node::Double(0.0);
    target.copy_value_from(&Node::Double(-4.5)).unwrap();
    assert_eq!(target, Node::Double(-4.5));
}

#[test]
fn copy_value_from_text_reuses_allocation() {
    let mut target = Node::Text(String::with_capacity(64));
    let before = target.as_str().unwrap().as_ptr();
    target.copy_value_from(&Node::text("reused")).unwrap();
    assert_eq!(target, Node::text("reused"));
    assert_eq!(target.as_str().unwrap().as_ptr(), before);
}

#[test]
fn copy_value_from_kind_mismatch_leaves_target_unchanged() {
    let mut target = Node::Int(5);
    let err = target.copy_value_from(&Node::text("5")).unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            expected: Kind::Int,
            found: Kind::Text,
        }
    );
    assert_eq!(target, Node::Int(5));
}

#[test]
fn reuse_or_replace_switches_kind() {
    let mut target = Node::Int(5);
    target.reuse_or_replace(&Node::text("five"));
    assert_eq!(target, Node::text("five"));
}

#[test]
fn clear_keeps_kind() {
    let mut text = Node::text("abc");
    text.clear();
    assert_eq!(text, Node::text(""));

    let mut array = Node::from(vec![Node::Int(1)]);
    array.clear();
    assert_eq!(array.kind(), Kind::Array);
    assert!(array.as_array().unwrap().is_empty());

    let mut int = Node::Int(8);
    int.clear();
    assert_eq!(int, Node::Int(0));
}

// ============================================================================
// Conversions and thread-safety
// ============================================================================

#[test]
fn from_conversions() {
    assert_eq!(Node::from(true), Node::Boolean(true));
    assert_eq!(Node::from(3), Node::Int(3));
    assert_eq!(Node::from(3i64), Node::Long(3));
    assert_eq!(Node::from(0.5), Node::Double(0.5));
    assert_eq!(Node::from("s"), Node::text("s"));
    assert_eq!(Node::from(None::<i32>), Node::Null);
    assert_eq!(Node::from(Some("x")), Node::text("x"));
}

#[test]
fn accessors() {
    assert_eq!(Node::Int(4).as_i64(), Some(4));
    assert_eq!(Node::Long(4).as_i64(), Some(4));
    assert_eq!(Node::Double(4.0).as_i64(), None);
    assert_eq!(Node::Int(4).as_f64(), Some(4.0));
    assert_eq!(Node::Boolean(true).as_bool(), Some(true));
    assert_eq!(Node::text("x").as_str(), Some("x"));
    assert!(Node::Null.as_object().is_none());
}

#[test]
fn node_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    fn assert_send<T: Send>() {}
    assert_send_sync::<Node>();
    assert_send_sync::<ArrayNode>();
    assert_send_sync::<ObjectNode>();
    assert_send::<flownode::StreamNode>();
}
