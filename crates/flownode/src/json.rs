//! Bridge between nodes and serde / `serde_json::Value`.
//!
//! Format adapters (JSON text, CSV, ...) live outside this crate; this module
//! gives them the conversions they need. Mapping rules:
//!
//! - JSON integers become Int when they fit in `i32`, Long when they fit in
//!   `i64`, Double otherwise.
//! - Missing serializes like Null (JSON has no absence marker).
//! - Non-finite doubles become JSON `null`.

use crate::array::ArrayNode;
use crate::node::Node;
use crate::object::ObjectNode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Boolean(b),
            Value::Number(n) => number_to_node(&n),
            Value::String(s) => Node::Text(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(name, value)| (name, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

fn number_to_node(n: &Number) -> Node {
    match n.as_i64() {
        Some(v) => i32::try_from(v).map_or(Node::Long(v), Node::Int),
        None => n.as_f64().map_or(Node::Null, Node::Double),
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null | Node::Missing => Value::Null,
            Node::Boolean(b) => Value::Bool(*b),
            Node::Int(v) => Value::Number((*v).into()),
            Node::Long(v) => Value::Number((*v).into()),
            Node::Double(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Node::Text(s) => Value::String(s.clone()),
            Node::Array(a) => Value::from(a),
            Node::Object(o) => Value::from(o),
        }
    }
}

impl From<&ArrayNode> for Value {
    fn from(array: &ArrayNode) -> Self {
        Value::Array(array.iter().map(Value::from).collect())
    }
}

impl From<&ObjectNode> for Value {
    fn from(object: &ObjectNode) -> Self {
        let map: Map<String, Value> = object
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(value)))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null | Node::Missing => serializer.serialize_unit(),
            Node::Boolean(b) => serializer.serialize_bool(*b),
            Node::Int(v) => serializer.serialize_i32(*v),
            Node::Long(v) => serializer.serialize_i64(*v),
            Node::Double(v) => serializer.serialize_f64(*v),
            Node::Text(s) => serializer.serialize_str(s),
            Node::Array(a) => a.serialize(serializer),
            Node::Object(o) => o.serialize(serializer),
        }
    }
}

impl Serialize for ArrayNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for ObjectNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}
