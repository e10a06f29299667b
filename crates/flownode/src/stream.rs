//! Lazy, single-pass array node.
//!
//! A [`StreamNode`] wraps a one-shot producer of nodes, typically the values
//! of a group handed to an operator. It can be consumed like an array but is
//! never materialized unless asked to, and it cannot be stored in a record:
//! serializing, decoding into or reuse-copying a stream fails with
//! [`NodeError::Unsupported`]. Call [`StreamNode::materialize`] first.
//!
//! ```
//! use flownode::{Node, StreamNode};
//!
//! let stream = StreamNode::new((1..=3).map(Node::Int));
//! assert!(!stream.is_empty());
//! assert_eq!(stream.iter().count(), 3);
//! assert_eq!(stream.iter().count(), 0); // drained
//! ```

use crate::array::ArrayNode;
use crate::contract::JsonNode;
use crate::error::{NodeError, Result};
use crate::kind::Kind;
use crate::node::Node;
use bytes::BufMut;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Fuse, FusedIterator};

/// Maximum number of elements rendered by [`JsonNode::append_as_text`].
pub const STREAM_PREVIEW_LIMIT: usize = 100;

const MATERIALIZE_HINT: &str = "materialize the stream into an array first";

/// A node backed by a single-use sequence producer.
///
/// Equality, ordering and hashing are by identity: two streams are equal
/// only if they are the same stream.
pub struct StreamNode {
    producer: RefCell<Producer>,
}

impl StreamNode {
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Node>,
        I::IntoIter: Send + 'static,
    {
        Self {
            producer: RefCell::new(Producer::new(nodes.into_iter())),
        }
    }

    /// A stream that yields nothing.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Replaces the producer, discarding whatever the old one had left.
    pub fn set_producer<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = Node>,
        I::IntoIter: Send + 'static,
    {
        *self.producer.get_mut() = Producer::new(nodes.into_iter());
    }

    /// Drops the remaining elements.
    pub fn clear(&mut self) {
        *self.producer.get_mut() = Producer::new(std::iter::empty());
    }

    /// Whether the producer has no further element. Looks ahead without handing
    /// an element to anyone: the next iteration still sees it.
    pub fn is_empty(&self) -> bool {
        self.producer.borrow_mut().peek().is_none()
    }

    /// Drains the producer. A second call after exhaustion yields nothing.
    pub fn iter(&self) -> StreamIter<'_> {
        StreamIter { stream: self }
    }

    /// Drains the remaining elements into a concrete, serializable array.
    pub fn materialize(&self) -> ArrayNode {
        let array: ArrayNode = self.iter().collect();
        tracing::debug!(len = array.len(), "materialized stream node");
        array
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }

    fn unsupported(operation: &'static str) -> NodeError {
        NodeError::Unsupported {
            kind: Kind::Stream,
            operation,
            hint: MATERIALIZE_HINT,
        }
    }
}

/// The element source of a stream: a buffer of elements already pulled
/// (by a look-ahead or a preview) in front of the fused remainder.
///
/// Fusing keeps an exhausted stream exhausted even when the wrapped iterator
/// would resume after returning `None`.
pub struct Producer {
    buffered: VecDeque<Node>,
    rest: Fuse<Box<dyn Iterator<Item = Node> + Send>>,
}

impl Producer {
    fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Node> + Send + 'static,
    {
        let iter: Box<dyn Iterator<Item = Node> + Send> = Box::new(iter);
        Self {
            buffered: VecDeque::new(),
            rest: iter.fuse(),
        }
    }

    fn peek(&mut self) -> Option<&Node> {
        if self.buffered.is_empty() {
            let next = self.rest.next()?;
            self.buffered.push_back(next);
        }
        self.buffered.front()
    }

    /// Puts already pulled elements back in front, in order.
    fn unread(&mut self, nodes: Vec<Node>) {
        for node in nodes.into_iter().rev() {
            self.buffered.push_front(node);
        }
    }
}

impl Iterator for Producer {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        self.buffered.pop_front().or_else(|| self.rest.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (low, high) = self.rest.size_hint();
        let buffered = self.buffered.len();
        (
            low.saturating_add(buffered),
            high.and_then(|h| h.checked_add(buffered)),
        )
    }
}

impl FusedIterator for Producer {}

impl Default for StreamNode {
    fn default() -> Self {
        Self::empty()
    }
}

/// Draining iterator returned by [`StreamNode::iter`].
pub struct StreamIter<'a> {
    stream: &'a StreamNode,
}

impl Iterator for StreamIter<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        self.stream.producer.borrow_mut().next()
    }
}

impl IntoIterator for StreamNode {
    type Item = Node;
    type IntoIter = Producer;

    fn into_iter(self) -> Self::IntoIter {
        self.producer.into_inner()
    }
}

impl<'a> IntoIterator for &'a StreamNode {
    type Item = Node;
    type IntoIter = StreamIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl JsonNode for StreamNode {
    fn kind(&self) -> Kind {
        Kind::Stream
    }

    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering> {
        Ok(self.address().cmp(&other.address()))
    }

    /// Renders at most [`STREAM_PREVIEW_LIMIT`] elements followed by `, ...`
    /// when more remain.
    ///
    /// The rendered prefix is pulled out of the producer and put back in
    /// front of the remainder afterwards, so printing a stream does not
    /// consume it.
    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let mut producer = self.producer.borrow_mut();
        let preview: Vec<Node> = producer.by_ref().take(STREAM_PREVIEW_LIMIT).collect();
        let truncated = producer.peek().is_some();

        if truncated {
            tracing::debug!(limit = STREAM_PREVIEW_LIMIT, "stream preview truncated");
        }
        let rendered = render_preview(&preview, truncated, out);
        producer.unread(preview);
        rendered
    }

    fn write<B: BufMut>(&self, _out: &mut B) -> Result<()> {
        Err(Self::unsupported("write"))
    }

    fn read_into(&mut self, _input: &mut &[u8]) -> Result<()> {
        Err(Self::unsupported("read_into"))
    }

    fn max_normalized_key_len(&self) -> usize {
        0
    }

    fn write_normalized_key(&self, target: &mut [u8]) -> usize {
        target.fill(0);
        0
    }

    fn copy_value_from(&mut self, _other: &Self) -> Result<()> {
        Err(Self::unsupported("copy_value_from"))
    }
}

fn render_preview(preview: &[Node], truncated: bool, out: &mut dyn fmt::Write) -> fmt::Result {
    out.write_char('[')?;
    for (i, node) in preview.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        node.append_as_text(out)?;
    }
    if truncated {
        out.write_str(", ...")?;
    }
    out.write_char(']')
}

impl PartialEq for StreamNode {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for StreamNode {}

impl Hash for StreamNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for StreamNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamNode")
            .field("exhausted", &self.is_empty())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for StreamNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_as_text(f)
    }
}
