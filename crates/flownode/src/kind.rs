//! The fixed set of node kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying a node's variant.
///
/// A node's kind is fixed for its lifetime. The declaration order doubles as
/// the cross-kind sort order used by [`Node::compare_to`](crate::Node::compare_to),
/// and the discriminant is the one-byte wire tag written by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Kind {
    Null = 0,
    Missing = 1,
    Boolean = 2,
    Int = 3,
    Long = 4,
    Double = 5,
    Text = 6,
    Array = 7,
    Object = 8,
    /// Lazy one-pass array. Has no wire tag; streams are never encoded.
    Stream = 9,
}

impl Kind {
    /// Wire tag for this kind, or `None` for [`Kind::Stream`].
    pub fn tag(self) -> Option<u8> {
        match self {
            Kind::Stream => None,
            other => Some(other as u8),
        }
    }

    /// Inverse of [`Kind::tag`]. Unknown tags and the stream ordinal yield `None`.
    pub fn from_tag(tag: u8) -> Option<Kind> {
        Some(match tag {
            0 => Kind::Null,
            1 => Kind::Missing,
            2 => Kind::Boolean,
            3 => Kind::Int,
            4 => Kind::Long,
            5 => Kind::Double,
            6 => Kind::Text,
            7 => Kind::Array,
            8 => Kind::Object,
            _ => return None,
        })
    }

    /// Null and Missing are the two absence kinds.
    pub fn is_absent(self) -> bool {
        matches!(self, Kind::Null | Kind::Missing)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Int | Kind::Long | Kind::Double)
    }

    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Object | Kind::Stream)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Missing => "missing",
            Kind::Boolean => "boolean",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Double => "double",
            Kind::Text => "text",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Stream => "stream",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
