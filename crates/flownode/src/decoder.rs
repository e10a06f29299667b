//! Binary decoder: bytes back into (reused) node trees.
//!
//! The wire format is described in [`crate::encoder`].
//!
//! # Key design decisions
//!
//! - **Two passes**: every read first walks the encoding on a read-only
//!   cursor, checking lengths, tags, UTF-8 and counts without touching the
//!   target. Only a fully valid encoding reaches the apply pass, so a
//!   truncated or corrupt input never leaves a half-updated node behind.
//! - **Reuse on read**: the apply pass decodes into the existing tree. Array
//!   children are reused by position and object children by field name when
//!   the stored tag matches their kind; everything else is replaced, and the
//!   container is trimmed or extended to the stored count.
//! - **Canonical objects**: field names must appear in strictly ascending
//!   order, which is what the encoder produces. This rejects duplicates
//!   without allocating during validation.

use crate::array::ArrayNode;
use crate::contract::JsonNode;
use crate::error::{NodeError, Result};
use crate::kind::Kind;
use crate::node::Node;
use crate::object::ObjectNode;

/// Nesting limit enforced during validation.
pub const MAX_DEPTH: usize = 512;

/// Decode one tagged node. The whole input must be consumed.
pub fn decode(bytes: &[u8]) -> Result<Node> {
    let mut input = bytes;
    let mut node = Node::Null;
    read_node(&mut node, &mut input)?;
    if !input.is_empty() {
        return Err(NodeError::Malformed(format!(
            "{} trailing bytes after node",
            input.len()
        )));
    }
    Ok(node)
}

pub(crate) fn read_node(node: &mut Node, input: &mut &[u8]) -> Result<()> {
    let consumed = validate(input, |cursor| cursor.skip_node(0))?;
    let mut cursor = Cursor::new(&input[..consumed]);
    apply_node(node, &mut cursor)?;
    *input = &input[consumed..];
    Ok(())
}

pub(crate) fn read_array(array: &mut ArrayNode, input: &mut &[u8]) -> Result<()> {
    let consumed = validate(input, |cursor| cursor.skip_array(0))?;
    let mut cursor = Cursor::new(&input[..consumed]);
    apply_array(array, &mut cursor)?;
    *input = &input[consumed..];
    Ok(())
}

pub(crate) fn read_object(object: &mut ObjectNode, input: &mut &[u8]) -> Result<()> {
    let consumed = validate(input, |cursor| cursor.skip_object(0))?;
    let mut cursor = Cursor::new(&input[..consumed]);
    apply_object(object, &mut cursor)?;
    *input = &input[consumed..];
    Ok(())
}

/// Runs the validating walk and returns how many bytes the encoding spans.
fn validate<'a>(
    input: &'a [u8],
    walk: impl FnOnce(&mut Cursor<'a>) -> Result<()>,
) -> Result<usize> {
    let mut cursor = Cursor::new(input);
    match walk(&mut cursor) {
        Ok(()) => Ok(cursor.pos),
        Err(e) => {
            tracing::debug!(error = %e, offset = cursor.pos, "rejecting node encoding");
            Err(e)
        }
    }
}

fn apply_node(node: &mut Node, cursor: &mut Cursor<'_>) -> Result<()> {
    let kind = cursor.kind()?;
    if node.kind() != kind {
        // Validation already rejected stream and unknown tags.
        *node = Node::empty_of(kind).unwrap_or_default();
    }
    match node {
        Node::Null | Node::Missing => {}
        Node::Boolean(b) => *b = cursor.u8()? != 0,
        Node::Int(v) => *v = cursor.i32()?,
        Node::Long(v) => *v = cursor.i64()?,
        Node::Double(v) => *v = cursor.f64()?,
        Node::Text(s) => {
            let text = cursor.text()?;
            s.clear();
            s.push_str(text);
        }
        Node::Array(a) => apply_array(a, cursor)?,
        Node::Object(o) => apply_object(o, cursor)?,
    }
    Ok(())
}

fn apply_array(array: &mut ArrayNode, cursor: &mut Cursor<'_>) -> Result<()> {
    let count = cursor.count()?;
    let children = array.children_mut();
    children.truncate(count);
    children.reserve(count - children.len());
    for index in 0..count {
        match children.get_mut(index) {
            Some(child) => apply_node(child, cursor)?,
            None => {
                let mut child = Node::Null;
                apply_node(&mut child, cursor)?;
                children.push(child);
            }
        }
    }
    Ok(())
}

fn apply_object(object: &mut ObjectNode, cursor: &mut Cursor<'_>) -> Result<()> {
    let count = cursor.count()?;
    let fields = object.fields_mut();
    let mut incoming = Vec::with_capacity(count);
    for _ in 0..count {
        let name = cursor.text()?;
        match fields.get_mut(name) {
            Some(child) => apply_node(child, cursor)?,
            None => {
                let mut child = Node::Null;
                apply_node(&mut child, cursor)?;
                fields.insert(name.to_string(), child);
            }
        }
        incoming.push(name);
    }
    // Validated names arrive in ascending order and are all present by now,
    // so a single ordered pass drops the stale ones.
    let mut incoming = incoming.into_iter().peekable();
    fields.retain(|name, child| {
        incoming.next_if(|next| *next == name.as_str()).is_some() && !child.is_missing()
    });
    Ok(())
}

/// Read-only position over an input slice.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.buf.len() - self.pos;
        if n > available {
            return Err(NodeError::Truncated {
                needed: n,
                available,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    fn kind(&mut self) -> Result<Kind> {
        let tag = self.u8()?;
        Kind::from_tag(tag).ok_or_else(|| NodeError::Malformed(format!("unknown kind tag {tag}")))
    }

    fn count(&mut self) -> Result<usize> {
        let count = self.i32()?;
        usize::try_from(count)
            .map_err(|_| NodeError::Malformed(format!("negative child count {count}")))
    }

    fn text(&mut self) -> Result<&'a str> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map_err(|e| NodeError::Malformed(format!("text is not valid UTF-8: {e}")))
    }

    fn skip_node(&mut self, depth: usize) -> Result<()> {
        match self.kind()? {
            Kind::Null | Kind::Missing => Ok(()),
            Kind::Boolean => match self.u8()? {
                0 | 1 => Ok(()),
                other => Err(NodeError::Malformed(format!("boolean byte {other}"))),
            },
            Kind::Int => self.take(4).map(drop),
            Kind::Long | Kind::Double => self.take(8).map(drop),
            Kind::Text => self.text().map(drop),
            Kind::Array => self.skip_array(depth + 1),
            Kind::Object => self.skip_object(depth + 1),
            Kind::Stream => Err(NodeError::Malformed("stream nodes have no encoding".into())),
        }
    }

    fn skip_array(&mut self, depth: usize) -> Result<()> {
        check_depth(depth)?;
        let count = self.count()?;
        for _ in 0..count {
            self.skip_node(depth)?;
        }
        Ok(())
    }

    fn skip_object(&mut self, depth: usize) -> Result<()> {
        check_depth(depth)?;
        let count = self.count()?;
        let mut previous: Option<&str> = None;
        for _ in 0..count {
            let name = self.text()?;
            if previous.is_some_and(|p| p >= name) {
                return Err(NodeError::Malformed(format!(
                    "object field {name:?} duplicated or out of order"
                )));
            }
            previous = Some(name);
            self.skip_node(depth)?;
        }
        Ok(())
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(NodeError::Malformed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}
