//! Binary encoder: node trees to bytes.
//!
//! All integers are big-endian. A node is its one-byte [`Kind`] tag followed
//! by a kind-specific payload:
//!
//! ```text
//! Null, Missing   (no payload)
//! Boolean         u8, 0 or 1
//! Int             i32
//! Long            i64
//! Double          f64 (IEEE 754 bits)
//! Text            len:u32, then len bytes of UTF-8
//! Array           count:i32, then count nodes
//! Object          count:i32, then count (Text payload, node) pairs in name order
//! ```
//!
//! Containers written on their own ([`ArrayNode`], [`ObjectNode`], typed
//! views) omit the leading tag and start with the count.
//!
//! Trees nested deeper than [`MAX_DEPTH`] are rejected with
//! [`NodeError::Encode`] before anything is written, since the decoder
//! would refuse them.
//!
//! # Example
//! ```
//! use flownode::{decode, encode, Node};
//!
//! let node = Node::from(vec![Node::Int(1), Node::text("two")]);
//! let bytes = encode(&node).unwrap();
//! assert_eq!(bytes[0], 7); // array tag
//! assert_eq!(decode(&bytes).unwrap(), node);
//! ```

use crate::array::ArrayNode;
use crate::contract::JsonNode;
use crate::decoder::MAX_DEPTH;
use crate::error::{NodeError, Result};
use crate::kind::Kind;
use crate::node::Node;
use crate::object::ObjectNode;
use bytes::BufMut;

/// Encode a node, tag included, into a fresh buffer.
pub fn encode(node: &Node) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_node(node, &mut out)?;
    Ok(out)
}

/// Tag plus payload.
pub(crate) fn write_node<B: BufMut>(node: &Node, out: &mut B) -> Result<()> {
    check_node_depth(node, 0)?;
    put_node(node, out)
}

/// Count followed by each child, tagged.
pub(crate) fn write_array<B: BufMut>(array: &ArrayNode, out: &mut B) -> Result<()> {
    check_array_depth(array, 0)?;
    put_array(array, out)
}

/// Count followed by `(name, value)` pairs.
pub(crate) fn write_object<B: BufMut>(object: &ObjectNode, out: &mut B) -> Result<()> {
    check_object_depth(object, 0)?;
    put_object(object, out)
}

fn put_node<B: BufMut>(node: &Node, out: &mut B) -> Result<()> {
    out.put_u8(wire_tag(node.kind())?);
    match node {
        Node::Null | Node::Missing => Ok(()),
        Node::Boolean(b) => {
            out.put_u8(u8::from(*b));
            Ok(())
        }
        Node::Int(v) => {
            out.put_i32(*v);
            Ok(())
        }
        Node::Long(v) => {
            out.put_i64(*v);
            Ok(())
        }
        Node::Double(v) => {
            out.put_f64(*v);
            Ok(())
        }
        Node::Text(s) => write_text(s, out),
        Node::Array(a) => put_array(a, out),
        Node::Object(o) => put_object(o, out),
    }
}

fn put_array<B: BufMut>(array: &ArrayNode, out: &mut B) -> Result<()> {
    write_count(array.len(), out)?;
    for child in array {
        put_node(child, out)?;
    }
    Ok(())
}

fn put_object<B: BufMut>(object: &ObjectNode, out: &mut B) -> Result<()> {
    write_count(object.len(), out)?;
    for (name, value) in object {
        write_text(name, out)?;
        put_node(value, out)?;
    }
    Ok(())
}

// The depth walk mirrors the decoder's validation so that everything the
// encoder writes decodes again. It runs before the first byte is written.

fn check_node_depth(node: &Node, depth: usize) -> Result<()> {
    match node {
        Node::Array(a) => check_array_depth(a, depth + 1),
        Node::Object(o) => check_object_depth(o, depth + 1),
        _ => Ok(()),
    }
}

fn check_array_depth(array: &ArrayNode, depth: usize) -> Result<()> {
    check_depth(depth)?;
    array.iter().try_for_each(|child| check_node_depth(child, depth))
}

fn check_object_depth(object: &ObjectNode, depth: usize) -> Result<()> {
    check_depth(depth)?;
    object.iter().try_for_each(|(_, value)| check_node_depth(value, depth))
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(NodeError::Encode(format!(
            "nesting deeper than {MAX_DEPTH} levels cannot be decoded"
        )));
    }
    Ok(())
}

fn write_text<B: BufMut>(s: &str, out: &mut B) -> Result<()> {
    let len = u32::try_from(s.len()).map_err(|_| {
        NodeError::Encode(format!("text of {} bytes exceeds u32 length", s.len()))
    })?;
    out.put_u32(len);
    out.put_slice(s.as_bytes());
    Ok(())
}

fn write_count<B: BufMut>(count: usize, out: &mut B) -> Result<()> {
    let count = i32::try_from(count).map_err(|_| {
        NodeError::Encode(format!("container of {count} children exceeds i32 count"))
    })?;
    out.put_i32(count);
    Ok(())
}

fn wire_tag(kind: Kind) -> Result<u8> {
    kind.tag().ok_or(NodeError::Unsupported {
        kind,
        operation: "write",
        hint: "materialize the stream into an array before serializing",
    })
}
