//! # Normalized sort keys
//!
//! A normalized key is a fixed-length, byte-comparable prefix of a node. The
//! sort and partitioning layer compares keys with a single `memcmp` and only
//! falls back to [`JsonNode::compare_to_same_type`] on ties:
//!
//! ```text
//! key(a) < key(b)  ==>  a.compare_to_same_type(b) == Less
//! ```
//!
//! The implication is one-directional. Truncation makes unequal nodes share a
//! key, so equal keys say nothing about equality.
//!
//! ## Layout per kind
//!
//! ```text
//! Null, Missing  1 byte   0x00 absence marker, shared by both kinds
//! Boolean        1 byte   0x00 false, 0x01 true
//! Int            4 bytes  big-endian, sign bit flipped
//! Long           8 bytes  big-endian, sign bit flipped
//! Double         8 bytes  IEEE bits: negatives inverted, positives sign-flipped
//! Text           unbounded, UTF-8 bytes truncated to the target length
//! Array, Object  0 bytes  (no prefix; always a tie)
//! ```
//!
//! Flipping the sign bit makes two's complement integers sort as unsigned
//! bytes. The double transform orders exactly like `f64::total_cmp`, which is
//! the comparator doubles use. UTF-8 byte order equals `str` order.
//!
//! Bytes of the target region past the key material are zero-filled, so a
//! key region always has a deterministic fixed length.

use crate::contract::JsonNode;
use crate::kind::Kind;
use crate::node::Node;

/// Width of the marker shared by Null and Missing.
pub const ABSENT_KEY_LEN: usize = 1;

const ABSENT_MARKER: u8 = 0x00;

/// Upper bound on the key length a node of `kind` ever writes.
pub fn max_len(kind: Kind) -> usize {
    match kind {
        Kind::Null | Kind::Missing => ABSENT_KEY_LEN,
        Kind::Boolean => 1,
        Kind::Int => 4,
        Kind::Long | Kind::Double => 8,
        Kind::Text => usize::MAX,
        Kind::Array | Kind::Object | Kind::Stream => 0,
    }
}

/// Allocates a `len`-byte key region and fills it from `node`.
///
/// ```
/// use flownode::{key::normalized_key, Node};
///
/// let low = normalized_key(&Node::Int(-5), 4);
/// let high = normalized_key(&Node::Int(3), 4);
/// assert!(low < high);
/// ```
pub fn normalized_key<N: JsonNode + ?Sized>(node: &N, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    node.write_normalized_key(&mut buf);
    buf
}

pub(crate) fn write_node_key(node: &Node, target: &mut [u8]) -> usize {
    match node {
        Node::Null | Node::Missing => write_padded(target, &[ABSENT_MARKER]),
        Node::Boolean(b) => write_padded(target, &[u8::from(*b)]),
        Node::Int(v) => write_padded(target, &int_key(*v)),
        Node::Long(v) => write_padded(target, &long_key(*v)),
        Node::Double(v) => write_padded(target, &double_key(*v)),
        Node::Text(s) => write_padded(target, s.as_bytes()),
        Node::Array(_) | Node::Object(_) => write_padded(target, &[]),
    }
}

/// Copies as much of `key` as fits, zero-fills the rest, and returns the
/// number of key bytes copied.
fn write_padded(target: &mut [u8], key: &[u8]) -> usize {
    let n = key.len().min(target.len());
    target[..n].copy_from_slice(&key[..n]);
    target[n..].fill(0);
    n
}

fn int_key(v: i32) -> [u8; 4] {
    ((v as u32) ^ (1 << 31)).to_be_bytes()
}

fn long_key(v: i64) -> [u8; 8] {
    ((v as u64) ^ (1 << 63)).to_be_bytes()
}

fn double_key(v: f64) -> [u8; 8] {
    let bits = v.to_bits();
    let ordered = if bits >> 63 == 1 { !bits } else { bits ^ (1 << 63) };
    ordered.to_be_bytes()
}
