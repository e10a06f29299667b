//! Field-name keyed container node.

use crate::contract::JsonNode;
use crate::decoder;
use crate::encoder;
use crate::error::Result;
use crate::kind::Kind;
use crate::node::{append_text_literal, Node};
use bytes::BufMut;
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A mapping from unique field names to child nodes.
///
/// Fields iterate, compare and encode in ascending name order. Looking up an
/// absent field returns the shared Missing node, and storing Missing removes
/// the field, so an object never holds a Missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectNode {
    fields: BTreeMap<String, Node>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value of `name`, or the Missing node when the field is absent.
    pub fn get(&self, name: &str) -> &Node {
        self.fields.get(name).unwrap_or(Node::missing())
    }

    /// Runs `f` on the value of `name`, if present. A value left Missing by
    /// `f` removes the field.
    pub fn update<R>(&mut self, name: &str, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        let value = self.fields.get_mut(name)?;
        let result = f(value);
        if value.is_missing() {
            self.fields.remove(name);
        }
        Some(result)
    }

    /// Runs `f` on every field in name order, then drops the fields it left
    /// Missing.
    pub fn update_all(&mut self, mut f: impl FnMut(&str, &mut Node)) {
        self.fields.retain(|name, value| {
            f(name, value);
            !value.is_missing()
        });
    }

    /// Direct slot access for in-crate callers that never store Missing.
    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields.get_mut(name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Stores `value` under `name`. A Missing value removes the field.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Node>) -> &mut Self {
        let name = name.into();
        match value.into() {
            Node::Missing => {
                self.fields.remove(&name);
            }
            value => {
                self.fields.insert(name, value);
            }
        }
        self
    }

    /// Copies every field of `other` into this object, replacing fields with
    /// the same name.
    pub fn put_all(&mut self, other: &ObjectNode) -> &mut Self {
        for (name, value) in &other.fields {
            self.fields.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.fields.remove(name)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Reuse copy keyed by field name: fields present on both sides are
    /// updated in place (or replaced on a kind change), fields only in
    /// `other` are cloned in, fields only in `self` are dropped.
    pub(crate) fn copy_from(&mut self, other: &ObjectNode) {
        self.fields.retain(|name, _| other.fields.contains_key(name));
        for (name, incoming) in &other.fields {
            match self.fields.get_mut(name) {
                Some(existing) => existing.reuse_or_replace(incoming),
                None => {
                    self.fields.insert(name.clone(), incoming.clone());
                }
            }
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut BTreeMap<String, Node> {
        &mut self.fields
    }
}

/// Iterator over `(name, value)` pairs in name order.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a ObjectNode {
    type Item = (&'a str, &'a Node);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl JsonNode for ObjectNode {
    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering> {
        Ok(self.cmp(other))
    }

    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_char('{')?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            append_text_literal(name, out)?;
            out.write_str(": ")?;
            value.append_as_text(out)?;
        }
        out.write_char('}')
    }

    fn write<B: BufMut>(&self, out: &mut B) -> Result<()> {
        encoder::write_object(self, out)
    }

    fn read_into(&mut self, input: &mut &[u8]) -> Result<()> {
        decoder::read_object(self, input)
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

impl fmt::Display for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_as_text(f)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for ObjectNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = ObjectNode::new();
        for (name, value) in iter {
            object.put(name, value);
        }
        object
    }
}
