//! # flownode
//!
//! The document value model of a dataflow engine: the node trees every
//! record is made of, their binary codec, and the byte-comparable
//! normalized keys the sort layer pre-orders records with.
//!
//! Three things set this apart from a general JSON library:
//!
//! - **Reuse**: [`JsonNode::copy_value_from`] and [`JsonNode::read_into`]
//!   overwrite an existing tree in place, reusing every child whose kind
//!   still matches, so steady-state record processing does not allocate.
//! - **Normalized keys**: every node writes a fixed-length prefix that
//!   orders consistently with its comparator (see [`key`]).
//! - **Typed views and streams**: [`typed_object!`] views give typed field
//!   access over an object node without copying it; [`StreamNode`] exposes a
//!   lazy one-pass producer through the same contract.
//!
//! ## Quick start
//!
//! ```rust
//! use flownode::{decode, encode, JsonNode, Node, ObjectNode};
//!
//! let mut record = ObjectNode::new();
//! record.put("name", "Ada").put("year", 1843);
//! let record = Node::from(record);
//!
//! // Node -> bytes -> Node
//! let bytes = encode(&record).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), record);
//!
//! // Decode the next record into the same tree, reusing its children.
//! let mut reused = record.clone();
//! let mut next = ObjectNode::new();
//! next.put("name", "Grace").put("year", 1906);
//! let next = Node::from(next);
//! reused.read_into(&mut encode(&next).unwrap().as_slice()).unwrap();
//! assert_eq!(reused, next);
//! ```
//!
//! ## Modules
//!
//! - [`node`]: the `Node` sum type and the Null/Missing singletons
//! - [`contract`]: the `JsonNode` capability trait
//! - [`array`], [`object`]: container nodes and the reuse-copy algorithm
//! - [`stream`]: lazy one-pass array node
//! - [`typed`]: typed views and the `typed_object!` macro
//! - [`encoder`], [`decoder`]: binary codec
//! - [`key`]: normalized sort keys
//! - [`json`]: serde / `serde_json::Value` bridge
//! - [`error`]: error types

pub mod array;
pub mod contract;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod key;
pub mod kind;
pub mod node;
pub mod object;
pub mod stream;
pub mod typed;

pub use array::ArrayNode;
pub use contract::JsonNode;
pub use decoder::decode;
pub use encoder::encode;
pub use error::{NodeError, Result};
pub use kind::Kind;
pub use node::Node;
pub use object::ObjectNode;
pub use stream::{StreamNode, STREAM_PREVIEW_LIMIT};
pub use typed::{TypedObject, TypedObjectNode};

#[doc(hidden)]
pub mod __private {
    pub use bytes::BufMut;
    pub use paste::paste;
}
