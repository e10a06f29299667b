/// ObjectNode tests: field access, absence handling and name-keyed reuse.
use flownode::{decode, encode, JsonNode, Kind, Node, NodeError, ObjectNode};
use std::cmp::Ordering;

fn person(name: &str, age: i32) -> ObjectNode {
    let mut object = ObjectNode::new();
    object.put("name", name).put("age", age);
    object
}

// ============================================================================
// Field access
// ============================================================================

#[test]
fn absent_field_is_missing_singleton() {
    let object = person("Ada", 36);
    assert!(std::ptr::eq(object.get("email"), Node::missing()));
    assert!(!object.contains_field("email"));
}

#[test]
fn put_replaces_existing_field() {
    let mut object = person("Ada", 36);
    object.put("age", 37);
    assert_eq!(object.len(), 2);
    assert_eq!(object.get("age"), &Node::Int(37));
}

#[test]
fn put_missing_removes_field() {
    let mut object = person("Ada", 36);
    object.put("age", Node::Missing);
    assert!(!object.contains_field("age"));
    assert_eq!(object.len(), 1);

    object.put("never", Node::Missing);
    assert_eq!(object.len(), 1);
}

#[test]
fn put_null_is_stored() {
    let mut object = ObjectNode::new();
    object.put("nothing", Node::Null);
    assert!(object.contains_field("nothing"));
    assert!(object.get("nothing").is_null());
}

#[test]
fn fields_iterate_in_name_order() {
    let mut object = ObjectNode::new();
    object.put("zeta", 1).put("alpha", 2).put("mu", 3);
    let names: Vec<&str> = object.field_names().collect();
    assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    assert_eq!(object.iter().len(), 3);
}

#[test]
fn put_all_and_remove() {
    let mut object = person("Ada", 36);
    let mut extra = ObjectNode::new();
    extra.put("age", 40).put("city", "London");
    object.put_all(&extra);
    assert_eq!(object.get("age"), &Node::Int(40));
    assert_eq!(object.get("city"), &Node::text("London"));

    assert_eq!(object.remove("city"), Some(Node::text("London")));
    assert_eq!(object.remove("city"), None);
}

#[test]
fn from_iter_drops_missing_values() {
    let object = ObjectNode::from_iter([("a", Node::Int(1)), ("b", Node::Missing)]);
    assert_eq!(object.len(), 1);
}

#[test]
fn update_edits_value_in_place() {
    let mut object = person("Ada", 36);
    let old = object.update("age", |age| std::mem::replace(age, Node::Int(37)));
    assert_eq!(old, Some(Node::Int(36)));
    assert_eq!(object.get("age"), &Node::Int(37));
    assert_eq!(object.update("email", |_| ()), None);
    assert!(!object.contains_field("email"));
}

#[test]
fn update_to_missing_removes_field() {
    let mut object = person("Ada", 36);
    object.update("age", |age| *age = Node::Missing);
    assert!(!object.contains_field("age"));
    assert_eq!(object.len(), 1);

    let node = Node::from(object);
    assert_eq!(decode(&encode(&node).unwrap()).unwrap(), node);
}

#[test]
fn update_all_visits_in_order_and_drops_missing() {
    let mut object = ObjectNode::from_iter([("b", 2), ("a", 1), ("c", 3)]);
    let mut visited = Vec::new();
    object.update_all(|name, value| {
        visited.push(name.to_string());
        if *value == Node::Int(2) {
            *value = Node::Missing;
        } else {
            *value = Node::Long(10);
        }
    });
    assert_eq!(visited, vec!["a", "b", "c"]);
    assert_eq!(object, ObjectNode::from_iter([("a", 10i64), ("c", 10i64)]));
    assert!(object.iter().all(|(_, value)| !value.is_missing()));
}

// ============================================================================
// Comparison and keys
// ============================================================================

#[test]
fn equal_objects_compare_equal() {
    let a = person("Ada", 36);
    let b = person("Ada", 36);
    assert_eq!(a, b);
    assert_eq!(a.compare_to_same_type(&b).unwrap(), Ordering::Equal);
}

#[test]
fn objects_compare_by_sorted_entries() {
    let a = person("Ada", 36);
    let b = person("Ada", 37);
    assert_eq!(a.compare_to_same_type(&b).unwrap(), Ordering::Less);
}

#[test]
fn objects_have_no_key_prefix() {
    let object = person("Ada", 36);
    let mut target = [0xFFu8; 3];
    assert_eq!(object.max_normalized_key_len(), 0);
    assert_eq!(object.write_normalized_key(&mut target), 0);
    assert_eq!(target, [0; 3]);
    assert_eq!(object.kind(), Kind::Object);
}

// ============================================================================
// Reuse copies
// ============================================================================

#[test]
fn copy_value_from_matches_source() {
    let mut target = person("Ada", 36);
    target.put("stale", true);
    let mut source = person("Grace", 85);
    source.put("fresh", 1.5);

    target.copy_value_from(&source).unwrap();
    assert_eq!(target, source);
    assert!(!target.contains_field("stale"));
}

#[test]
fn copy_value_from_reuses_fields_by_name() {
    let mut target = ObjectNode::new();
    target.put("name", Node::Text(String::with_capacity(32)));
    let before = target.get("name").as_str().unwrap().as_ptr();

    target.copy_value_from(&person("Grace", 85)).unwrap();
    assert_eq!(target.get("name").as_str().unwrap().as_ptr(), before);
    assert_eq!(target.get("name"), &Node::text("Grace"));
}

#[test]
fn copy_value_from_keeps_surviving_field_names() {
    let mut target = person("Ada", 36);
    target.put("stale", true);
    let name_key = target.field_names().find(|n| *n == "name").unwrap().as_ptr();

    let mut source = person("Grace", 85);
    source.put("fresh", 1.5);
    target.copy_value_from(&source).unwrap();

    assert_eq!(target, source);
    let after = target.field_names().find(|n| *n == "name").unwrap().as_ptr();
    assert_eq!(after, name_key);
}

#[test]
fn read_into_updates_fields_in_place() {
    let mut target = person("Ada", 36);
    target.put("stale", true).put("bio", Node::Text(String::with_capacity(64)));
    let name_key = target.field_names().find(|n| *n == "name").unwrap().as_ptr();
    let bio_buf = target.get("bio").as_str().unwrap().as_ptr();

    let source = ObjectNode::from_iter([("bio", "short"), ("name", "Grace"), ("zone", "UTC")]);
    let mut out: Vec<u8> = Vec::new();
    source.write(&mut out).unwrap();
    target.read_into(&mut out.as_slice()).unwrap();

    assert_eq!(target, source);
    assert_eq!(target.field_names().find(|n| *n == "name").unwrap().as_ptr(), name_key);
    assert_eq!(target.get("bio").as_str().unwrap().as_ptr(), bio_buf);
}

#[test]
fn read_into_drops_fields_encoded_as_missing() {
    let mut target = person("Ada", 36);
    // {"age": <missing>, "name": "Bo"}
    let bytes = [
        0, 0, 0, 2, 0, 0, 0, 3, b'a', b'g', b'e', 1, 0, 0, 0, 4, b'n', b'a', b'm', b'e', 6, 0, 0,
        0, 2, b'B', b'o',
    ];
    target.read_into(&mut &bytes[..]).unwrap();
    assert_eq!(target, ObjectNode::from_iter([("name", "Bo")]));
}

#[test]
fn copy_value_from_replaces_field_on_kind_change() {
    let mut target = person("Ada", 36);
    let mut source = ObjectNode::new();
    source.put("name", "Ada").put("age", "thirty-six");
    target.copy_value_from(&source).unwrap();
    assert_eq!(target.get("age"), &Node::text("thirty-six"));
}

#[test]
fn node_level_copy_rejects_non_object() {
    let mut target = Node::from(person("Ada", 36));
    let err = target.copy_value_from(&Node::Null).unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            expected: Kind::Object,
            found: Kind::Null,
        }
    );
    assert_eq!(target, Node::from(person("Ada", 36)));
}
