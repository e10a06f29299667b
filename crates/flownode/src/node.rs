//! The `Node` sum type: scalars, absence markers and the two containers.
//!
//! A record is a tree of `Node`s. Scalars hold their value inline; arrays and
//! objects own their children. Null and Missing carry no data and are also
//! available as process-wide statics through [`Node::null`] and
//! [`Node::missing`], which is what lookups of absent fields hand out.

use crate::array::ArrayNode;
use crate::contract::JsonNode;
use crate::decoder;
use crate::encoder;
use crate::error::{NodeError, Result};
use crate::key;
use crate::kind::Kind;
use crate::object::ObjectNode;
use bytes::BufMut;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

static NULL: Node = Node::Null;
static MISSING: Node = Node::Missing;

/// A document value.
///
/// The variant is the node's [`Kind`] and never changes in place: turning a
/// text into an array means assigning a new `Node` to the slot.
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Null,
    /// The value of a field or position that does not exist.
    Missing,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
    Array(ArrayNode),
    Object(ObjectNode),
}

impl Node {
    /// The shared Null instance.
    pub fn null() -> &'static Node {
        &NULL
    }

    /// The shared Missing instance returned for absent fields and positions.
    pub fn missing() -> &'static Node {
        &MISSING
    }

    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(value.into())
    }

    /// An empty node of the given kind, used as the decode target when no
    /// existing node can be reused. Returns `None` for [`Kind::Stream`].
    pub fn empty_of(kind: Kind) -> Option<Node> {
        Some(match kind {
            Kind::Null => Node::Null,
            Kind::Missing => Node::Missing,
            Kind::Boolean => Node::Boolean(false),
            Kind::Int => Node::Int(0),
            Kind::Long => Node::Long(0),
            Kind::Double => Node::Double(0.0),
            Kind::Text => Node::Text(String::new()),
            Kind::Array => Node::Array(ArrayNode::new()),
            Kind::Object => Node::Object(ObjectNode::new()),
            Kind::Stream => return None,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    /// True for both absence markers.
    pub fn is_absent(&self) -> bool {
        self.kind().is_absent()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value of an Int or Long node.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(v) => Some(i64::from(*v)),
            Node::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value of any numeric node, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Int(v) => Some(f64::from(*v)),
            Node::Long(v) => Some(*v as f64),
            Node::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayNode> {
        match self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether `other`'s value can be copied into this node in place.
    pub fn is_copyable(&self, other: &Node) -> bool {
        self.kind() == other.kind()
    }

    /// Fails with [`NodeError::TypeMismatch`] unless `other` has this node's kind.
    pub fn check_for_same_type(&self, other: &Node) -> Result<()> {
        if self.is_copyable(other) {
            Ok(())
        } else {
            Err(NodeError::TypeMismatch {
                expected: self.kind(),
                found: other.kind(),
            })
        }
    }

    /// Copies `other` in place when the kinds match, otherwise replaces this
    /// node with a clone of `other`.
    pub fn reuse_or_replace(&mut self, other: &Node) {
        if self.is_copyable(other) {
            copy_same_kind(self, other);
        } else {
            tracing::trace!(
                from = %self.kind(),
                to = %other.kind(),
                "kind changed, replacing node instead of reusing it"
            );
            *self = other.clone();
        }
    }

    /// Orders nodes of any kinds: first by kind, then by value.
    pub fn compare_to(&self, other: &Node) -> Ordering {
        match (self, other) {
            (Node::Null, Node::Null) | (Node::Missing, Node::Missing) => Ordering::Equal,
            (Node::Boolean(a), Node::Boolean(b)) => a.cmp(b),
            (Node::Int(a), Node::Int(b)) => a.cmp(b),
            (Node::Long(a), Node::Long(b)) => a.cmp(b),
            (Node::Double(a), Node::Double(b)) => a.total_cmp(b),
            (Node::Text(a), Node::Text(b)) => a.as_str().cmp(b.as_str()),
            (Node::Array(a), Node::Array(b)) => a.cmp(b),
            (Node::Object(a), Node::Object(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }

    /// Resets the value while keeping the kind: containers are emptied, text
    /// is cleared, numbers become zero.
    pub fn clear(&mut self) {
        match self {
            Node::Null | Node::Missing => {}
            Node::Boolean(b) => *b = false,
            Node::Int(v) => *v = 0,
            Node::Long(v) => *v = 0,
            Node::Double(v) => *v = 0.0,
            Node::Text(s) => s.clear(),
            Node::Array(a) => a.clear(),
            Node::Object(o) => o.clear(),
        }
    }
}

/// Copies between two nodes already known to share a kind.
fn copy_same_kind(target: &mut Node, source: &Node) {
    match (target, source) {
        (Node::Boolean(a), Node::Boolean(b)) => *a = *b,
        (Node::Int(a), Node::Int(b)) => *a = *b,
        (Node::Long(a), Node::Long(b)) => *a = *b,
        (Node::Double(a), Node::Double(b)) => *a = *b,
        (Node::Text(a), Node::Text(b)) => {
            a.clear();
            a.push_str(b);
        }
        (Node::Array(a), Node::Array(b)) => a.copy_from(b),
        (Node::Object(a), Node::Object(b)) => a.copy_from(b),
        // Null and Missing carry no value.
        _ => {}
    }
}

impl JsonNode for Node {
    fn kind(&self) -> Kind {
        match self {
            Node::Null => Kind::Null,
            Node::Missing => Kind::Missing,
            Node::Boolean(_) => Kind::Boolean,
            Node::Int(_) => Kind::Int,
            Node::Long(_) => Kind::Long,
            Node::Double(_) => Kind::Double,
            Node::Text(_) => Kind::Text,
            Node::Array(_) => Kind::Array,
            Node::Object(_) => Kind::Object,
        }
    }

    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering> {
        self.check_for_same_type(other)?;
        Ok(self.compare_to(other))
    }

    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match self {
            Node::Null => out.write_str("null"),
            Node::Missing => out.write_str("<missing>"),
            Node::Boolean(b) => write!(out, "{b}"),
            Node::Int(v) => write!(out, "{v}"),
            Node::Long(v) => write!(out, "{v}"),
            // Debug formatting keeps the fraction (`1.0`), so doubles never
            // render like integers.
            Node::Double(v) => write!(out, "{v:?}"),
            Node::Text(s) => append_text_literal(s, out),
            Node::Array(a) => a.append_as_text(out),
            Node::Object(o) => o.append_as_text(out),
        }
    }

    fn write<B: BufMut>(&self, out: &mut B) -> Result<()> {
        encoder::write_node(self, out)
    }

    fn read_into(&mut self, input: &mut &[u8]) -> Result<()> {
        decoder::read_node(self, input)
    }

    fn max_normalized_key_len(&self) -> usize {
        key::max_len(self.kind())
    }

    fn write_normalized_key(&self, target: &mut [u8]) -> usize {
        key::write_node_key(self, target)
    }

    fn copy_value_from(&mut self, other: &Self) -> Result<()> {
        self.check_for_same_type(other)?;
        copy_same_kind(self, other);
        Ok(())
    }
}

/// Renders `s` as a quoted, escaped string literal.
pub(crate) fn append_text_literal(s: &str, out: &mut dyn fmt::Write) -> fmt::Result {
    let literal = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    out.write_str(&literal)
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) | (Node::Missing, Node::Missing) => true,
            (Node::Boolean(a), Node::Boolean(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Long(a), Node::Long(b)) => a == b,
            // Bitwise, to agree with `total_cmp`.
            (Node::Double(a), Node::Double(b)) => a.to_bits() == b.to_bits(),
            (Node::Text(a), Node::Text(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            (Node::Object(a), Node::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Node::Null | Node::Missing => {}
            Node::Boolean(b) => b.hash(state),
            Node::Int(v) => v.hash(state),
            Node::Long(v) => v.hash(state),
            Node::Double(v) => v.to_bits().hash(state),
            Node::Text(s) => s.hash(state),
            Node::Array(a) => a.hash(state),
            Node::Object(o) => o.hash(state),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_as_text(f)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Boolean(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Long(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<ArrayNode> for Node {
    fn from(value: ArrayNode) -> Self {
        Node::Array(value)
    }
}

impl From<ObjectNode> for Node {
    fn from(value: ObjectNode) -> Self {
        Node::Object(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(ArrayNode::from(value))
    }
}

/// `None` becomes Null, matching how field writers store an unset value.
impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}
