//! Ordered container node with in-place reuse.
//!
//! [`ArrayNode::copy_value_from`] is the hot operation of the engine: rather
//! than dropping its children and deep-cloning the incoming array, it walks
//! both arrays position by position and mutates each existing child in place
//! whenever the incoming child has the same kind. Only kind changes and
//! growth allocate.
//!
//! ```
//! use flownode::{ArrayNode, JsonNode, Node};
//!
//! let mut reused = ArrayNode::from(vec![Node::text("a"), Node::Int(1)]);
//! let incoming = ArrayNode::from(vec![Node::text("b"), Node::text("c"), Node::Int(3)]);
//! reused.copy_value_from(&incoming).unwrap();
//! assert_eq!(reused, incoming);
//! ```

use crate::contract::JsonNode;
use crate::decoder;
use crate::encoder;
use crate::error::{NodeError, Result};
use crate::kind::Kind;
use crate::node::Node;
use bytes::BufMut;
use std::cmp::Ordering;
use std::fmt;

/// An ordered sequence of child nodes.
///
/// `len()` is exact and O(1). Reading past the end yields the shared Missing
/// node rather than a panic or `None`, so lookups chain without checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrayNode {
    children: Vec<Node>,
}

impl ArrayNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The child at `index`, or the Missing node past the end.
    pub fn get(&self, index: usize) -> &Node {
        self.children.get(index).unwrap_or(Node::missing())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// Replaces the child at `index`, or appends when `index == len()`.
    /// Returns the replaced child, if any.
    pub fn set(&mut self, index: usize, node: impl Into<Node>) -> Result<Option<Node>> {
        let len = self.children.len();
        match index.cmp(&len) {
            Ordering::Less => Ok(Some(std::mem::replace(&mut self.children[index], node.into()))),
            Ordering::Equal => {
                self.children.push(node.into());
                Ok(None)
            }
            Ordering::Greater => Err(NodeError::IndexOutOfBounds { index, len }),
        }
    }

    pub fn add(&mut self, node: impl Into<Node>) -> &mut Self {
        self.children.push(node.into());
        self
    }

    pub fn add_all<I>(&mut self, nodes: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Inserts at `index`, shifting later children right.
    pub fn insert(&mut self, index: usize, node: impl Into<Node>) -> Result<()> {
        let len = self.children.len();
        if index > len {
            return Err(NodeError::IndexOutOfBounds { index, len });
        }
        self.children.insert(index, node.into());
        Ok(())
    }

    /// Removes and returns the child at `index`, shifting later children left.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn truncate(&mut self, len: usize) {
        self.children.truncate(len);
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.children.iter().any(|child| child == node)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.children.iter_mut()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.children
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.children
    }

    /// Reuse copy between arrays. Always succeeds: children of a differing
    /// kind are replaced rather than copied into.
    pub(crate) fn copy_from(&mut self, other: &ArrayNode) {
        let common = self.children.len().min(other.children.len());
        for (existing, incoming) in self.children[..common]
            .iter_mut()
            .zip(&other.children[..common])
        {
            existing.reuse_or_replace(incoming);
        }
        self.children.truncate(other.children.len());
        self.children.extend(other.children[common..].iter().cloned());
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }
}

impl JsonNode for ArrayNode {
    fn kind(&self) -> Kind {
        Kind::Array
    }

    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering> {
        Ok(self.cmp(other))
    }

    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        append_elements(self.children.iter(), out)
    }

    fn write<B: BufMut>(&self, out: &mut B) -> Result<()> {
        encoder::write_array(self, out)
    }

    fn read_into(&mut self, input: &mut &[u8]) -> Result<()> {
        decoder::read_array(self, input)
    }

    fn max_normalized_key_len(&self) -> usize {
        0
    }

    fn write_normalized_key(&self, target: &mut [u8]) -> usize {
        target.fill(0);
        0
    }

    fn copy_value_from(&mut self, other: &Self) -> Result<()> {
        self.copy_from(other);
        Ok(())
    }
}

/// Renders `[a, b, c]`.
pub(crate) fn append_elements<'n>(
    elements: impl Iterator<Item = &'n Node>,
    out: &mut dyn fmt::Write,
) -> fmt::Result {
    out.write_char('[')?;
    for (i, node) in elements.enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        node.append_as_text(out)?;
    }
    out.write_char(']')
}

impl fmt::Display for ArrayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_as_text(f)
    }
}

impl From<Vec<Node>> for ArrayNode {
    fn from(children: Vec<Node>) -> Self {
        Self { children }
    }
}

impl FromIterator<Node> for ArrayNode {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl Extend<Node> for ArrayNode {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.children.extend(iter);
    }
}

impl IntoIterator for ArrayNode {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArrayNode {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
