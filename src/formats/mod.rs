//! Format presets and the wire codec boundary.
//!
//! A preset is a [`Serializer`] configured for the generic trees of one wire format: which
//! values the format carries as leaves, and how containers are laid out. Turning a generic tree
//! into text or bytes is a [`Codec`]'s job; [`CodecSerializer`] chains the two.
//!
//! | Preset | Tree serializer | Codec | Feature |
//! | ------ | --------------- | ----- | ------- |
//! | JSON   | [`json::serializer`] | [`json::JsonText`] | `json` |
//! | BSON   | [`bson::serializer`] | [`bson::BsonBytes`] | `bson` |
use crate::{Descriptor, Result, Serializer, Value};

pub mod bson;
pub mod json;

/// Converts a generic tree to and from its serialized form.
pub trait Codec {
    /// The borrowed serialized form, such as `str` or `[u8]`.
    type Wire: ?Sized + ToOwned;

    /// Serialize a generic tree.
    fn encode(&self, tree: &Value) -> Result<<Self::Wire as ToOwned>::Owned>;

    /// Read a generic tree from its serialized form.
    fn decode(&self, wire: &Self::Wire) -> Result<Value>;
}

/// A tree [`Serializer`] chained with a [`Codec`].
///
/// # Example
/// ```rust
/// # #[cfg(feature = "json")] {
/// # use tyser::*;
/// let point = Shape::builder("Point")
///     .field("x", Descriptor::INT)
///     .field("y", Descriptor::INT)
///     .finish();
///
/// let ser = formats::json::text_serializer();
/// let p = ser.deserialize(&Descriptor::record(&point), r#"{"x": 1, "y": 2}"#).unwrap();
/// assert_eq!(p.to_string(), "Point(x: 1, y: 2)");
/// assert_eq!(ser.serialize(&p).unwrap(), r#"{"x":1,"y":2}"#);
/// # }
/// ```
#[derive(Debug)]
pub struct CodecSerializer<C> {
    tree: Serializer,
    codec: C,
}

impl<C: Codec> CodecSerializer<C> {
    /// Chain `tree` with `codec`.
    pub fn new(tree: Serializer, codec: C) -> Self {
        CodecSerializer { tree, codec }
    }

    /// Serialize `value` to its generic tree, then encode the tree.
    pub fn serialize(&self, value: &Value) -> Result<<C::Wire as ToOwned>::Owned> {
        self.codec.encode(&self.tree.serialize(value)?)
    }

    /// Decode a generic tree, then read it as `target`.
    pub fn deserialize(&self, target: &Descriptor, wire: &C::Wire) -> Result<Value> {
        self.tree.deserialize(target, &self.codec.decode(wire)?)
    }

    /// The tree serializer.
    pub fn tree(&self) -> &Serializer {
        &self.tree
    }

    /// The tree serializer, to register further handlers with.
    pub fn tree_mut(&mut self) -> &mut Serializer {
        &mut self.tree
    }

    /// The codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }
}
