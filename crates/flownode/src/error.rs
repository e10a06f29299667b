//! Error types for node mutation, comparison and the binary codec.

use crate::kind::Kind;
use thiserror::Error;

/// Errors raised by node operations.
///
/// Every error is reported synchronously by the call that triggered it. A
/// failed operation leaves the target node exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A reuse copy, same-type comparison or typed accessor was handed a node
    /// of a kind the target cannot represent.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// The operation is not defined for this kind (streams must be
    /// materialized before they are serialized or reused).
    #[error("unsupported operation `{operation}` on {kind} node: {hint}")]
    Unsupported {
        kind: Kind,
        operation: &'static str,
        hint: &'static str,
    },

    /// The byte source ended before a complete node could be read.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// The byte source holds something that is not a valid node encoding.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Positional write past the end of an array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The node cannot be expressed in the wire format (e.g. a text longer
    /// than `u32::MAX` bytes).
    #[error("encoding error: {0}")]
    Encode(String),
}

/// Convenience alias used throughout flownode.
pub type Result<T> = std::result::Result<T, NodeError>;
