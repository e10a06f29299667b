//! The capability contract shared by every node type.
//!
//! [`Node`](crate::Node) is the closed sum type that records are built from;
//! [`ArrayNode`](crate::ArrayNode), [`ObjectNode`](crate::ObjectNode),
//! [`StreamNode`](crate::StreamNode) and typed views implement the same
//! contract so operator code can be written once against [`JsonNode`].

use crate::error::Result;
use crate::kind::Kind;
use bytes::BufMut;
use std::cmp::Ordering;
use std::fmt;

/// Operations every node exposes.
///
/// Equality and hashing come from the standard `PartialEq`/`Eq`/`Hash`
/// impls and agree with [`JsonNode::compare_to_same_type`] returning
/// `Ordering::Equal`. Deep copies come from `Clone` (streams excepted).
pub trait JsonNode {
    /// The node's kind tag. Never changes for the lifetime of the node.
    fn kind(&self) -> Kind;

    /// Orders two nodes of the same kind.
    ///
    /// Comparing across kinds is a caller error reported as
    /// [`NodeError::TypeMismatch`](crate::NodeError::TypeMismatch); route
    /// through [`Node::compare_to`](crate::Node::compare_to) when kinds may differ.
    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering>;

    /// Canonical human-readable rendering. Not the wire format.
    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Encodes this node into `out`.
    ///
    /// The sink must be able to grow (`Vec<u8>`, `BytesMut`).
    fn write<B: BufMut>(&self, out: &mut B) -> Result<()>;

    /// Decodes into this node, reusing existing storage where the stored
    /// kinds line up. On success `input` is advanced past the consumed
    /// bytes; on failure neither `self` nor `input` is modified.
    fn read_into(&mut self, input: &mut &[u8]) -> Result<()>;

    /// Upper bound on the normalized key length this node's kind needs.
    fn max_normalized_key_len(&self) -> usize;

    /// Writes the normalized key prefix into `target` and returns the number
    /// of key bytes written (never more than [`JsonNode::max_normalized_key_len`]).
    /// Remaining bytes of `target` are zero-filled.
    fn write_normalized_key(&self, target: &mut [u8]) -> usize;

    /// Overwrites this node's value with `other`'s, mutating existing
    /// children in place wherever their kinds are compatible.
    fn copy_value_from(&mut self, other: &Self) -> Result<()>;
}
