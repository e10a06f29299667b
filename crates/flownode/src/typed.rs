//! Typed views over object nodes.
//!
//! A typed view gives operator code named, typed field accessors without
//! copying the record: the view borrows the object node it describes and
//! every read or write goes straight to that node. Nested objects come back
//! as views bound to the parent's field slot, so writes through them land in
//! the parent too.
//!
//! Views are declared with [`typed_object!`](crate::typed_object):
//!
//! ```
//! use flownode::{typed_object, ObjectNode, TypedObject};
//!
//! typed_object! {
//!     /// A postal address.
//!     pub struct Address {
//!         city: Text,
//!     }
//! }
//!
//! typed_object! {
//!     pub struct Person {
//!         name: Text,
//!         age: Long,
//!         address: Object(Address),
//!     }
//! }
//!
//! let mut record = ObjectNode::new();
//! record.put("name", "Ada");
//! record.put("address", ObjectNode::from_iter([("city", "London")]));
//!
//! {
//!     let mut person = Person::bind(&mut record);
//!     assert_eq!(person.name().unwrap(), Some("Ada"));
//!     assert_eq!(person.age().unwrap(), None);
//!
//!     person.address().unwrap().unwrap().set_city("Marylebone");
//!     person.set_age(36);
//! }
//!
//! assert_eq!(record.get("age").as_i64(), Some(36));
//! assert_eq!(
//!     record.get("address").as_object().unwrap().get("city").as_str(),
//!     Some("Marylebone")
//! );
//! ```

use crate::contract::JsonNode;
use crate::error::{NodeError, Result};
use crate::kind::Kind;
use crate::node::Node;
use crate::object::{self, ObjectNode};
use bytes::BufMut;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Where a view's fields live.
enum Backing<'a> {
    /// Standalone view, or the result of cloning a view.
    Owned(ObjectNode),
    /// View over someone else's object node.
    Borrowed(&'a mut ObjectNode),
}

/// The untyped core of every view: a handle to a backing object node plus
/// absence-aware field access.
///
/// All [`JsonNode`] operations delegate to the backing node. Cloning
/// deep-clones the backing node, so the clone is an independent, owned view.
pub struct TypedObjectNode<'a> {
    backing: Backing<'a>,
}

impl<'a> TypedObjectNode<'a> {
    /// A view over a fresh, empty object node it owns.
    pub fn new() -> Self {
        Self::adopt(ObjectNode::new())
    }

    /// A view that takes ownership of `backing`.
    pub fn adopt(backing: ObjectNode) -> Self {
        Self {
            backing: Backing::Owned(backing),
        }
    }

    /// A view over `backing`. Writes through the view are writes to `backing`.
    pub fn bind(backing: &'a mut ObjectNode) -> Self {
        Self {
            backing: Backing::Borrowed(backing),
        }
    }

    /// Re-points the view at another object node.
    pub fn set_backing_node(&mut self, backing: &'a mut ObjectNode) {
        self.backing = Backing::Borrowed(backing);
    }

    pub fn backing_node(&self) -> &ObjectNode {
        match &self.backing {
            Backing::Owned(object) => object,
            Backing::Borrowed(object) => object,
        }
    }

    pub fn backing_node_mut(&mut self) -> &mut ObjectNode {
        match &mut self.backing {
            Backing::Owned(object) => object,
            Backing::Borrowed(object) => object,
        }
    }

    /// Whether the view owns its backing node.
    pub fn is_owned(&self) -> bool {
        matches!(self.backing, Backing::Owned(_))
    }

    /// The backing node by value: moved out when owned, cloned when borrowed.
    pub fn into_object(self) -> ObjectNode {
        match self.backing {
            Backing::Owned(object) => object,
            Backing::Borrowed(object) => object.clone(),
        }
    }

    /// The stored value of `name`, with Null and Missing both read as `None`.
    pub fn get(&self, name: &str) -> Option<&Node> {
        let value = self.backing_node().get(name);
        (!value.is_absent()).then_some(value)
    }

    pub fn get_text(&self, name: &str) -> Result<Option<&str>> {
        self.get_as(name, Kind::Text, Node::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        self.get_as(name, Kind::Boolean, Node::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i32>> {
        self.get_as(name, Kind::Int, |node| match node {
            Node::Int(v) => Some(*v),
            _ => None,
        })
    }

    /// Reads an Int or Long field as `i64`.
    pub fn get_long(&self, name: &str) -> Result<Option<i64>> {
        self.get_as(name, Kind::Long, Node::as_i64)
    }

    /// Reads any numeric field as `f64`.
    pub fn get_double(&self, name: &str) -> Result<Option<f64>> {
        self.get_as(name, Kind::Double, Node::as_f64)
    }

    fn get_as<'s, T>(
        &'s self,
        name: &str,
        expected: Kind,
        extract: impl FnOnce(&'s Node) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(node) => extract(node).map(Some).ok_or(NodeError::TypeMismatch {
                expected,
                found: node.kind(),
            }),
        }
    }

    /// Wraps the object stored under `name` in a view of type `V`.
    ///
    /// The returned view borrows the field slot itself, so no data is copied
    /// and writes through it are visible in this view's backing node.
    pub fn get_view<'s, V: TypedObject<'s>>(&'s mut self, name: &str) -> Result<Option<V>> {
        match self.backing_node_mut().field_mut(name) {
            None | Some(Node::Null) | Some(Node::Missing) => Ok(None),
            Some(Node::Object(object)) => Ok(Some(V::bind(object))),
            Some(other) => Err(NodeError::TypeMismatch {
                expected: Kind::Object,
                found: other.kind(),
            }),
        }
    }

    /// Stores `value` under `name`. Missing removes the field.
    pub fn put(&mut self, name: &str, value: impl Into<Node>) -> &mut Self {
        self.backing_node_mut().put(name, value);
        self
    }

    /// Stores a text value, reusing the existing text allocation when the
    /// field already holds text.
    pub fn put_text(&mut self, name: &str, value: &str) -> &mut Self {
        match self.backing_node_mut().field_mut(name) {
            Some(Node::Text(existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            _ => {
                self.backing_node_mut().put(name, value);
            }
        }
        self
    }

    /// Stores a deep copy of `view`'s backing node under `name`.
    pub fn put_view<'v, V: TypedObject<'v>>(&mut self, name: &str, view: &V) -> &mut Self {
        let value = view.backing_node().clone();
        self.backing_node_mut().put(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.backing_node_mut().remove(name)
    }

    pub fn put_all(&mut self, other: &ObjectNode) -> &mut Self {
        self.backing_node_mut().put_all(other);
        self
    }

    pub fn iter(&self) -> object::Iter<'_> {
        self.backing_node().iter()
    }

    pub fn len(&self) -> usize {
        self.backing_node().len()
    }

    pub fn is_empty(&self) -> bool {
        self.backing_node().is_empty()
    }

    pub fn clear(&mut self) {
        self.backing_node_mut().clear();
    }
}

impl Default for TypedObjectNode<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TypedObjectNode<'_> {
    fn clone(&self) -> Self {
        Self::adopt(self.backing_node().clone())
    }
}

impl PartialEq for TypedObjectNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.backing_node() == other.backing_node()
    }
}

impl Eq for TypedObjectNode<'_> {}

impl Hash for TypedObjectNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.backing_node().hash(state);
    }
}

impl fmt::Debug for TypedObjectNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedObjectNode")
            .field("owned", &self.is_owned())
            .field("backing", self.backing_node())
            .finish()
    }
}

impl fmt::Display for TypedObjectNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_as_text(f)
    }
}

impl JsonNode for TypedObjectNode<'_> {
    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn compare_to_same_type(&self, other: &Self) -> Result<Ordering> {
        self.backing_node().compare_to_same_type(other.backing_node())
    }

    fn append_as_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.backing_node().append_as_text(out)
    }

    fn write<B: BufMut>(&self, out: &mut B) -> Result<()> {
        self.backing_node().write(out)
    }

    fn read_into(&mut self, input: &mut &[u8]) -> Result<()> {
        self.backing_node_mut().read_into(input)
    }

    fn max_normalized_key_len(&self) -> usize {
        self.backing_node().max_normalized_key_len()
    }

    fn write_normalized_key(&self, target: &mut [u8]) -> usize {
        self.backing_node().write_normalized_key(target)
    }

    fn copy_value_from(&mut self, other: &Self) -> Result<()> {
        let source = other.backing_node();
        self.backing_node_mut().copy_value_from(source)
    }
}

/// A concrete typed view. Implemented by [`typed_object!`](crate::typed_object).
pub trait TypedObject<'a>: Sized {
    fn from_typed_node(node: TypedObjectNode<'a>) -> Self;

    fn typed_node(&self) -> &TypedObjectNode<'a>;

    fn typed_node_mut(&mut self) -> &mut TypedObjectNode<'a>;

    fn into_typed_node(self) -> TypedObjectNode<'a>;

    /// A view over a fresh object node it owns.
    fn detached() -> Self {
        Self::from_typed_node(TypedObjectNode::new())
    }

    fn bind(backing: &'a mut ObjectNode) -> Self {
        Self::from_typed_node(TypedObjectNode::bind(backing))
    }

    fn adopt(backing: ObjectNode) -> Self {
        Self::from_typed_node(TypedObjectNode::adopt(backing))
    }

    fn backing_node<'s>(&'s self) -> &'s ObjectNode
    where
        'a: 's,
    {
        self.typed_node().backing_node()
    }

    fn backing_node_mut<'s>(&'s mut self) -> &'s mut ObjectNode
    where
        'a: 's,
    {
        self.typed_node_mut().backing_node_mut()
    }

    fn into_object(self) -> ObjectNode {
        self.into_typed_node().into_object()
    }
}

/// Declares a typed view struct with accessor pairs for its fields.
///
/// Each field generates a getter named after the field and a `set_` setter.
/// Field names double as the stored field names. Supported field types:
///
/// | Type           | Getter                                  | Setter argument   |
/// |----------------|-----------------------------------------|-------------------|
/// | `Text`         | `Result<Option<&str>>`                  | `&str`            |
/// | `Boolean`      | `Result<Option<bool>>`                  | `bool`            |
/// | `Int`          | `Result<Option<i32>>`                   | `i32`             |
/// | `Long`         | `Result<Option<i64>>`                   | `i64`             |
/// | `Double`       | `Result<Option<f64>>`                   | `f64`             |
/// | `Object(View)` | `Result<Option<View<'_>>>` (`&mut self`) | `&View<'_>`       |
///
/// Getters return `Ok(None)` for absent, Null or Missing fields and
/// [`NodeError::TypeMismatch`](crate::NodeError::TypeMismatch) when the
/// stored kind cannot be read as the declared type.
#[macro_export]
macro_rules! typed_object {
    (@accessors [$(#[$m:meta])*] $field:ident Object $view:ident) => {
        $crate::__private::paste! {
            $(#[$m])*
            pub fn $field(&mut self) -> $crate::Result<Option<$view<'_>>> {
                self.0.get_view(stringify!($field))
            }

            pub fn [<set_ $field>](&mut self, value: &$view<'_>) -> &mut Self {
                self.0.put_view(stringify!($field), value);
                self
            }
        }
    };
    (@accessors [$(#[$m:meta])*] $field:ident Text) => {
        $crate::__private::paste! {
            $(#[$m])*
            pub fn $field(&self) -> $crate::Result<Option<&str>> {
                self.0.get_text(stringify!($field))
            }

            pub fn [<set_ $field>](&mut self, value: &str) -> &mut Self {
                self.0.put_text(stringify!($field), value);
                self
            }
        }
    };
    (@accessors [$(#[$m:meta])*] $field:ident Boolean) => {
        $crate::typed_object!(@scalar [$(#[$m])*] $field, bool, get_bool);
    };
    (@accessors [$(#[$m:meta])*] $field:ident Int) => {
        $crate::typed_object!(@scalar [$(#[$m])*] $field, i32, get_int);
    };
    (@accessors [$(#[$m:meta])*] $field:ident Long) => {
        $crate::typed_object!(@scalar [$(#[$m])*] $field, i64, get_long);
    };
    (@accessors [$(#[$m:meta])*] $field:ident Double) => {
        $crate::typed_object!(@scalar [$(#[$m])*] $field, f64, get_double);
    };

    (@scalar [$(#[$m:meta])*] $field:ident, $rust:ty, $getter:ident) => {
        $crate::__private::paste! {
            $(#[$m])*
            pub fn $field(&self) -> $crate::Result<Option<$rust>> {
                self.0.$getter(stringify!($field))
            }

            pub fn [<set_ $field>](&mut self, value: $rust) -> &mut Self {
                self.0.put(stringify!($field), value);
                self
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ident $( ( $view:ident ) )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        $vis struct $name<'a>($crate::TypedObjectNode<'a>);

        impl<'a> $crate::TypedObject<'a> for $name<'a> {
            fn from_typed_node(node: $crate::TypedObjectNode<'a>) -> Self {
                Self(node)
            }

            fn typed_node(&self) -> &$crate::TypedObjectNode<'a> {
                &self.0
            }

            fn typed_node_mut(&mut self) -> &mut $crate::TypedObjectNode<'a> {
                &mut self.0
            }

            fn into_typed_node(self) -> $crate::TypedObjectNode<'a> {
                self.0
            }
        }

        impl<'a> $name<'a> {
            $(
                $crate::typed_object!(@accessors [$(#[$field_meta])*] $field $ty $($view)?);
            )*
        }

        impl<'a> $crate::JsonNode for $name<'a> {
            fn kind(&self) -> $crate::Kind {
                $crate::JsonNode::kind(&self.0)
            }

            fn compare_to_same_type(&self, other: &Self) -> $crate::Result<::std::cmp::Ordering> {
                $crate::JsonNode::compare_to_same_type(&self.0, &other.0)
            }

            fn append_as_text(&self, out: &mut dyn ::std::fmt::Write) -> ::std::fmt::Result {
                $crate::JsonNode::append_as_text(&self.0, out)
            }

            fn write<B: $crate::__private::BufMut>(&self, out: &mut B) -> $crate::Result<()> {
                $crate::JsonNode::write(&self.0, out)
            }

            fn read_into(&mut self, input: &mut &[u8]) -> $crate::Result<()> {
                $crate::JsonNode::read_into(&mut self.0, input)
            }

            fn max_normalized_key_len(&self) -> usize {
                $crate::JsonNode::max_normalized_key_len(&self.0)
            }

            fn write_normalized_key(&self, target: &mut [u8]) -> usize {
                $crate::JsonNode::write_normalized_key(&self.0, target)
            }

            fn copy_value_from(&mut self, other: &Self) -> $crate::Result<()> {
                $crate::JsonNode::copy_value_from(&mut self.0, &other.0)
            }
        }

        impl ::std::fmt::Display for $name<'_> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}
